use crate::domain::comment::{
    Comment, CommentAuthor, CommentWithContext, CommentWithPost, CommentedPost,
};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, post_id: Uuid, content: String)
    -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    /// Comments on one post, oldest first.
    async fn list_by_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, DomainError>;
    /// Every comment with author and post, newest first.
    async fn list_all(&self, page: PageRequest) -> Result<Page<CommentWithContext>, DomainError>;
    /// One user's comments with their post, newest first.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithPost>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LIST_BY_POST: &str = r#"
    SELECT id, content, user_id, post_id, created_at, updated_at
    FROM comments
    WHERE post_id = $1
    ORDER BY created_at ASC, id ASC
    LIMIT $2 OFFSET $3
"#;

const LIST_ALL: &str = r#"
    SELECT
        c.id, c.content, c.user_id, c.post_id, c.created_at, c.updated_at,
        u.name AS author_name,
        p.title AS post_title
    FROM comments c
    JOIN users u ON u.id = c.user_id
    JOIN posts p ON p.id = c.post_id
    ORDER BY c.created_at DESC, c.id DESC
    LIMIT $1 OFFSET $2
"#;

const LIST_BY_USER: &str = r#"
    SELECT
        c.id, c.content, c.user_id, c.post_id, c.created_at, c.updated_at,
        p.title AS post_title
    FROM comments c
    JOIN posts p ON p.id = c.post_id
    WHERE c.user_id = $1
    ORDER BY c.created_at DESC, c.id DESC
    LIMIT $2 OFFSET $3
"#;

#[derive(sqlx::FromRow)]
struct CommentContextRow {
    id: Uuid,
    content: String,
    user_id: Uuid,
    post_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: String,
    post_title: String,
}

impl From<CommentContextRow> for CommentWithContext {
    fn from(row: CommentContextRow) -> Self {
        Self {
            user: CommentAuthor {
                id: row.user_id,
                name: row.author_name,
            },
            post: CommentedPost {
                id: row.post_id,
                title: row.post_title,
            },
            comment: Comment {
                id: row.id,
                content: row.content,
                user_id: row.user_id,
                post_id: row.post_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentPostRow {
    id: Uuid,
    content: String,
    user_id: Uuid,
    post_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    post_title: String,
}

impl From<CommentPostRow> for CommentWithPost {
    fn from(row: CommentPostRow) -> Self {
        Self {
            post: CommentedPost {
                id: row.post_id,
                title: row.post_title,
            },
            comment: Comment {
                id: row.id,
                content: row.content,
                user_id: row.user_id,
                post_id: row.post_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, user_id, post_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, user_id, post_id, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            DomainError::from(e)
        })?;

        info!(comment_id = %comment.id, post_id = %post_id, user_id = %user_id, "comment created");
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, user_id, post_id, created_at, updated_at
            FROM comments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find comment {}: {}", id, e);
            DomainError::from(e)
        })
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, content, user_id, post_id, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update comment {}: {}", id, e);
            DomainError::from(e)
        })?;

        info!(comment_id = %id, "comment updated");
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete comment {}: {}", id, e);
                DomainError::from(e)
            })?;

        info!(comment_id = %id, "comment deleted");
        Ok(())
    }

    async fn list_by_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, DomainError> {
        let comments = sqlx::query_as::<_, Comment>(LIST_BY_POST)
            .bind(post_id)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching comments of post {}: {}", post_id, e);
                DomainError::from(e)
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting comments of post {}: {}", post_id, e);
                DomainError::from(e)
            })?;

        Ok(Page::new(comments, total))
    }

    async fn list_all(&self, page: PageRequest) -> Result<Page<CommentWithContext>, DomainError> {
        let rows = sqlx::query_as::<_, CommentContextRow>(LIST_ALL)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching comments: {}", e);
                DomainError::from(e)
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting comments: {}", e);
                DomainError::from(e)
            })?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithPost>, DomainError> {
        let rows = sqlx::query_as::<_, CommentPostRow>(LIST_BY_USER)
            .bind(user_id)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching comments of user {}: {}", user_id, e);
                DomainError::from(e)
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting comments of user {}: {}", user_id, e);
                DomainError::from(e)
            })?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total))
    }
}
