use crate::domain::error::DomainError;
use crate::domain::like::Like;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Fails with `DomainError::LikeAlreadyExists` when the pair is already stored.
    async fn create(&self, user_id: Uuid, post_id: Uuid) -> Result<Like, DomainError>;
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, DomainError>;
    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn create(&self, user_id: Uuid, post_id: Uuid) -> Result<Like, DomainError> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("likes_user_id_post_id"))
                == Some(true)
            {
                DomainError::LikeAlreadyExists
            } else {
                error!("failed to create like: {}", e);
                DomainError::from(e)
            }
        })?;

        info!(like_id = %like.id, post_id = %post_id, user_id = %user_id, "post liked");
        Ok(like)
    }

    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, DomainError> {
        sqlx::query_as::<_, Like>(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find like ({}, {}): {}", user_id, post_id, e);
            DomainError::from(e)
        })
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting likes of {}: {}", post_id, e);
                DomainError::from(e)
            })
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete like {}: {}", id, e);
                DomainError::from(e)
            })?;

        info!(like_id = %id, "like deleted");
        Ok(())
    }
}
