use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_token, RefreshTokenRecord};
use crate::error::AppError;
use crate::store::{RefreshTokenStore, User, UserStore, Zinger, ZingerStore};

/// Postgres-backed store over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, created_at, updated_at, email, hashed_password, is_premium)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.is_premium)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, email, hashed_password, is_premium
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $1, hashed_password = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, created_at, updated_at, email, hashed_password, is_premium
            "#,
        )
        .bind(email)
        .bind(hashed_password)
        .bind(updated_at)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upgrade_to_premium(
        &self,
        user_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_premium = true, updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(updated_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, created_at, updated_at, expires_at)
            VALUES ($1, $2, $3, $3, $4)
            "#,
        )
        .bind(hash_token(token))
        .bind(user_id)
        .bind(created_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT token_hash, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1, updated_at = $1
            WHERE token_hash = $2
            "#,
        )
        .bind(revoked_at)
        .bind(hash_token(token))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.created_at, u.updated_at, u.email, u.hashed_password, u.is_premium
            FROM users u
            JOIN refresh_tokens rt ON rt.user_id = u.id
            WHERE rt.token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ZingerStore for PgStore {
    async fn create_zinger(&self, zinger: &Zinger) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO zingers (id, created_at, updated_at, body, user_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(zinger.id)
        .bind(zinger.created_at)
        .bind(zinger.updated_at)
        .bind(&zinger.body)
        .bind(zinger.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_zinger(&self, zinger_id: Uuid) -> Result<Option<Zinger>, AppError> {
        let zinger = sqlx::query_as::<_, Zinger>(
            "SELECT id, created_at, updated_at, body, user_id FROM zingers WHERE id = $1",
        )
        .bind(zinger_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(zinger)
    }

    async fn list_zingers(&self, author_id: Option<Uuid>) -> Result<Vec<Zinger>, AppError> {
        let zingers = match author_id {
            Some(author_id) => {
                sqlx::query_as::<_, Zinger>(
                    r#"
                    SELECT id, created_at, updated_at, body, user_id
                    FROM zingers
                    WHERE user_id = $1
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Zinger>(
                    r#"
                    SELECT id, created_at, updated_at, body, user_id
                    FROM zingers
                    ORDER BY created_at ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(zingers)
    }

    async fn delete_zinger(&self, zinger_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM zingers WHERE id = $1")
            .bind(zinger_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
