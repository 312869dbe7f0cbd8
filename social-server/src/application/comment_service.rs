use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{Comment, CommentWithContext, CommentWithPost};
use crate::domain::error::{
    CommentPostError, DeleteCommentError, DomainError, GetAllCommentsError, GetCommentPostError,
    UpdateCommentError,
};
use crate::domain::pagination::{Page, PageRequest};

/// Comment operations. Update and delete do not restrict the
/// caller to the comment's author.
#[derive(Clone)]
pub struct CommentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    #[instrument(skip(self, content))]
    pub async fn comment_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, CommentPostError> {
        if !self.users.exists(user_id).await? {
            return Err(CommentPostError::Unauthorized);
        }
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(CommentPostError::NotFound);
        }
        Ok(self.comments.create(user_id, post_id, content).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_comment_posts(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, GetCommentPostError> {
        if !self.users.exists(user_id).await? {
            return Err(GetCommentPostError::Unauthorized);
        }
        Ok(self.comments.list_by_post(post_id, page).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DeleteCommentError> {
        if !self.users.exists(user_id).await? {
            return Err(DeleteCommentError::Unauthorized);
        }
        if self.comments.find_by_id(comment_id).await?.is_none() {
            return Err(DeleteCommentError::NotFound);
        }
        Ok(self.comments.delete(comment_id).await?)
    }

    #[instrument(skip(self, content))]
    pub async fn update_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        content: String,
    ) -> Result<Comment, UpdateCommentError> {
        if !self.users.exists(user_id).await? {
            return Err(UpdateCommentError::Unauthorized);
        }
        if self.comments.find_by_id(comment_id).await?.is_none() {
            return Err(UpdateCommentError::NotFound);
        }
        Ok(self.comments.update_content(comment_id, content).await?)
    }

    /// Fails with `BadRequest` when the requested page is empty.
    #[instrument(skip(self))]
    pub async fn get_all_comments(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithContext>, GetAllCommentsError> {
        if !self.users.exists(user_id).await? {
            return Err(GetAllCommentsError::Unauthorized);
        }
        let comments = self.comments.list_all(page).await?;
        if comments.items.is_empty() {
            return Err(GetAllCommentsError::BadRequest);
        }
        Ok(comments)
    }

    #[instrument(skip(self))]
    pub async fn get_comments_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithPost>, DomainError> {
        self.comments.list_by_user(user_id, page).await
    }
}
