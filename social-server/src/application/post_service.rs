use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::{CreatePostError, DeletePostError, DomainError, GetPostError};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{FeedPost, NewPost, Post, SortOrder};

#[derive(Clone)]
pub struct PostService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Rejects empty input before touching the store.
    #[instrument(skip(self, input), fields(title_len = input.title.len()))]
    pub async fn create_post(&self, user_id: Uuid, input: NewPost) -> Result<Post, CreatePostError> {
        if !input.is_complete() {
            return Err(CreatePostError::BadRequest);
        }
        if !self.users.exists(user_id).await? {
            return Err(CreatePostError::Unauthorized);
        }
        Ok(self.posts.create(user_id, input).await?)
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, GetPostError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(GetPostError::NotFound)
    }

    /// The caller's own posts, oldest first.
    #[instrument(skip(self))]
    pub async fn list_mine(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.posts
            .list_by_user(user_id, SortOrder::Ascending, page)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_feed(
        &self,
        viewer_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<FeedPost>, DomainError> {
        self.posts.list_feed(viewer_id, page).await
    }

    /// Another user's posts, newest first.
    #[instrument(skip(self))]
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.posts
            .list_by_user(user_id, SortOrder::Descending, page)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_before(
        &self,
        before: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.posts.list_before(before, page).await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, keyword: &str, page: PageRequest) -> Result<Page<Post>, DomainError> {
        self.posts.search_title(keyword, page).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), DeletePostError> {
        if !self.users.exists(user_id).await? {
            return Err(DeletePostError::Unauthorized);
        }
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DeletePostError::NotFound)?;
        if post.user_id != user_id {
            return Err(DeletePostError::NotOwner);
        }
        Ok(self.posts.delete(post_id).await?)
    }
}
