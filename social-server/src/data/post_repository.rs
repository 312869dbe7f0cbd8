use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{FeedPost, NewPost, Post, SortOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn list_by_user(
        &self,
        user_id: Uuid,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError>;
    /// Newest first, with like/comment counts and the viewer's like flag.
    async fn list_feed(&self, viewer_id: Uuid, page: PageRequest)
    -> Result<Page<FeedPost>, DomainError>;
    /// Posts created strictly before `before`, oldest first.
    async fn list_before(
        &self,
        before: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError>;
    /// Case-insensitive substring match on the title, newest first.
    async fn search_title(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LIST_BY_USER_ASC: &str = r#"
    SELECT id, title, content, user_id, created_at, updated_at
    FROM posts
    WHERE user_id = $1
    ORDER BY created_at ASC, id ASC
    LIMIT $2 OFFSET $3
"#;

const LIST_BY_USER_DESC: &str = r#"
    SELECT id, title, content, user_id, created_at, updated_at
    FROM posts
    WHERE user_id = $1
    ORDER BY created_at DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

const LIST_FEED: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.created_at,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
        EXISTS(
            SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1
        ) AS liked_by_user,
        u.id AS user_id,
        u.username
    FROM posts p
    JOIN users u ON u.id = p.user_id
    ORDER BY p.created_at DESC, p.id DESC
    LIMIT $2 OFFSET $3
"#;

const LIST_BEFORE: &str = r#"
    SELECT id, title, content, user_id, created_at, updated_at
    FROM posts
    WHERE created_at < $1
    ORDER BY created_at ASC, id ASC
    LIMIT $2 OFFSET $3
"#;

const SEARCH_TITLE: &str = r#"
    SELECT id, title, content, user_id, created_at, updated_at
    FROM posts
    WHERE title ILIKE $1 ESCAPE '\'
    ORDER BY created_at DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

/// Escapes LIKE metacharacters so the keyword is matched literally.
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, user_id: Uuid, post: NewPost) -> Result<Post, DomainError> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, user_id, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::from(e)
        })?;

        info!(post_id = %created.id, user_id = %created.user_id, "post created");
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::from(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::from(e)
            })?;

        info!(post_id = %id, "post deleted");
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let query = match order {
            SortOrder::Ascending => LIST_BY_USER_ASC,
            SortOrder::Descending => LIST_BY_USER_DESC,
        };

        let posts = sqlx::query_as::<_, Post>(query)
            .bind(user_id)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts of {}: {}", user_id, e);
                DomainError::from(e)
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts of {}: {}", user_id, e);
                DomainError::from(e)
            })?;

        Ok(Page::new(posts, total))
    }

    async fn list_feed(
        &self,
        viewer_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<FeedPost>, DomainError> {
        let posts = sqlx::query_as::<_, FeedPost>(LIST_FEED)
            .bind(viewer_id)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching feed: {}", e);
                DomainError::from(e)
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts: {}", e);
                DomainError::from(e)
            })?;

        Ok(Page::new(posts, total))
    }

    async fn list_before(
        &self,
        before: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let posts = sqlx::query_as::<_, Post>(LIST_BEFORE)
            .bind(before)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts before {}: {}", before, e);
                DomainError::from(e)
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE created_at < $1")
            .bind(before)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts before {}: {}", before, e);
                DomainError::from(e)
            })?;

        Ok(Page::new(posts, total))
    }

    async fn search_title(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let pattern = format!("%{}%", escape_like(keyword));

        let posts = sqlx::query_as::<_, Post>(SEARCH_TITLE)
            .bind(&pattern)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while searching posts: {}", e);
                DomainError::from(e)
            })?;

        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM posts WHERE title ILIKE $1 ESCAPE '\'"#)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("db error while counting search results: {}", e);
                    DomainError::from(e)
                })?;

        Ok(Page::new(posts, total))
    }
}
