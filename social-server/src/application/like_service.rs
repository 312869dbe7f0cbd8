use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::{DeleteLikeError, DomainError, GetLikeStatusError, LikePostError};
use crate::domain::like::{Like, LikeStatus};

#[derive(Clone)]
pub struct LikeService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            likes,
        }
    }

    /// At most one like per (user, post). A concurrent duplicate that slips
    /// past the existence check is rejected by the store's unique key.
    #[instrument(skip(self))]
    pub async fn like_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Like, LikePostError> {
        if !self.users.exists(user_id).await? {
            return Err(LikePostError::Unauthorized);
        }
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(LikePostError::NotFound);
        }
        if self.likes.find(user_id, post_id).await?.is_some() {
            return Err(LikePostError::AlreadyLiked);
        }
        match self.likes.create(user_id, post_id).await {
            Ok(like) => Ok(like),
            Err(DomainError::LikeAlreadyExists) => Err(LikePostError::AlreadyLiked),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_like_status(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<LikeStatus, GetLikeStatusError> {
        if !self.users.exists(user_id).await? {
            return Err(GetLikeStatusError::Unauthorized);
        }
        let total = self.likes.count_by_post(post_id).await?;
        let already_liked = self.likes.find(user_id, post_id).await?.is_some();
        Ok(LikeStatus {
            total,
            already_liked,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Result<(), DeleteLikeError> {
        if !self.users.exists(user_id).await? {
            return Err(DeleteLikeError::Unauthorized);
        }
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DeleteLikeError::NotFound);
        }
        let like = self
            .likes
            .find(user_id, post_id)
            .await?
            .ok_or(DeleteLikeError::LikeNotFound)?;
        Ok(self.likes.delete(like.id).await?)
    }
}
