/// Persistence
///
/// Handlers and the session manager only see the store traits. `PgStore` backs
/// production; `MemoryStore` backs tests and local runs.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::RefreshTokenRecord;
use crate::error::AppError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    pub is_premium: bool,
}

impl User {
    pub fn new(email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email,
            hashed_password,
            is_premium: false,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Zinger {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl Zinger {
    pub fn new(user_id: Uuid, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body,
            user_id,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::UniqueConstraintViolation` on a taken email
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Returns the updated user, or `None` if no user has this id
    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError>;

    /// Returns `false` if no user has this id
    async fn upgrade_to_premium(
        &self,
        user_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;
}

/// Refresh tokens, addressed by their raw value
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn find_refresh_token(&self, token: &str)
        -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Sets `revoked_at`, overwriting any earlier value. Returns `false` if
    /// the token is unknown.
    async fn revoke_refresh_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ZingerStore: Send + Sync {
    async fn create_zinger(&self, zinger: &Zinger) -> Result<(), AppError>;

    async fn find_zinger(&self, zinger_id: Uuid) -> Result<Option<Zinger>, AppError>;

    /// Oldest first, optionally restricted to one author
    async fn list_zingers(&self, author_id: Option<Uuid>) -> Result<Vec<Zinger>, AppError>;

    /// Returns `false` if no zinger has this id
    async fn delete_zinger(&self, zinger_id: Uuid) -> Result<bool, AppError>;
}

/// The stores the application is wired with
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub zingers: Arc<dyn ZingerStore>,
}

impl Repositories {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserStore + RefreshTokenStore + ZingerStore + 'static,
    {
        Self {
            users: store.clone(),
            refresh_tokens: store.clone(),
            zingers: store,
        }
    }
}
