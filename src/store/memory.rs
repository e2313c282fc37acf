use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::{hash_token, RefreshTokenRecord};
use crate::error::{AppError, DatabaseError};
use crate::store::{RefreshTokenStore, User, UserStore, Zinger, ZingerStore};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    zingers: Vec<Zinger>,
}

/// In-process store with the same semantics as `PgStore`
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::Database(DatabaseError::UnexpectedError("store lock poisoned".to_string())))
    }
}

fn email_taken(state: &MemoryState, email: &str, except: Option<Uuid>) -> bool {
    state
        .users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

fn duplicate_email() -> AppError {
    AppError::Database(DatabaseError::UniqueConstraintViolation(
        "users_email_key".to_string(),
    ))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut state = self.lock()?;
        if email_taken(&state, &user.email, None) {
            return Err(duplicate_email());
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.lock()?;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let mut state = self.lock()?;
        if email_taken(&state, email, Some(user_id)) {
            return Err(duplicate_email());
        }
        Ok(state.users.get_mut(&user_id).map(|user| {
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            user.updated_at = updated_at;
            user.clone()
        }))
    }

    async fn upgrade_to_premium(
        &self,
        user_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut state = self.lock()?;
        match state.users.get_mut(&user_id) {
            Some(user) => {
                user.is_premium = true;
                user.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let token_hash = hash_token(token);
        let record = RefreshTokenRecord {
            token_hash: token_hash.clone(),
            user_id,
            created_at,
            updated_at: created_at,
            expires_at,
            revoked_at: None,
        };
        self.lock()?.refresh_tokens.insert(token_hash, record);
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let state = self.lock()?;
        Ok(state.refresh_tokens.get(&hash_token(token)).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut state = self.lock()?;
        match state.refresh_tokens.get_mut(&hash_token(token)) {
            Some(record) => {
                record.revoked_at = Some(revoked_at);
                record.updated_at = revoked_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let state = self.lock()?;
        Ok(state
            .refresh_tokens
            .get(&hash_token(token))
            .and_then(|record| state.users.get(&record.user_id))
            .cloned())
    }
}

#[async_trait]
impl ZingerStore for MemoryStore {
    async fn create_zinger(&self, zinger: &Zinger) -> Result<(), AppError> {
        self.lock()?.zingers.push(zinger.clone());
        Ok(())
    }

    async fn find_zinger(&self, zinger_id: Uuid) -> Result<Option<Zinger>, AppError> {
        let state = self.lock()?;
        Ok(state.zingers.iter().find(|z| z.id == zinger_id).cloned())
    }

    async fn list_zingers(&self, author_id: Option<Uuid>) -> Result<Vec<Zinger>, AppError> {
        let state = self.lock()?;
        let mut zingers: Vec<Zinger> = state
            .zingers
            .iter()
            .filter(|z| author_id.map_or(true, |author| z.user_id == author))
            .cloned()
            .collect();
        zingers.sort_by_key(|z| z.created_at);
        Ok(zingers)
    }

    async fn delete_zinger(&self, zinger_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.lock()?;
        let before = state.zingers.len();
        state.zingers.retain(|z| z.id != zinger_id);
        Ok(state.zingers.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RefreshTokenState;
    use chrono::Duration;

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store
            .create_user(&User::new("a@example.com".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let result = store
            .create_user(&User::new("a@example.com".to_string(), "hash".to_string()))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_refresh_tokens_are_stored_hashed() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_refresh_token("raw-token", Uuid::new_v4(), now, now + Duration::days(60))
            .await
            .unwrap();

        let record = store.find_refresh_token("raw-token").await.unwrap().unwrap();
        assert_eq!(record.token_hash, hash_token("raw-token"));
        assert!(store.find_refresh_token("other-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revocation_overwrites_timestamp() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_refresh_token("raw-token", Uuid::new_v4(), now, now + Duration::days(60))
            .await
            .unwrap();

        let first = now + Duration::seconds(1);
        let second = now + Duration::seconds(2);
        assert!(store.revoke_refresh_token("raw-token", first).await.unwrap());
        assert!(store.revoke_refresh_token("raw-token", second).await.unwrap());

        let record = store.find_refresh_token("raw-token").await.unwrap().unwrap();
        assert_eq!(record.revoked_at, Some(second));
        assert_eq!(record.state_at(now), RefreshTokenState::Revoked);
    }

    #[tokio::test]
    async fn test_revoking_unknown_token_reports_miss() {
        let store = MemoryStore::new();
        assert!(!store.revoke_refresh_token("missing", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_by_author() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.create_zinger(&Zinger::new(alice, "one".to_string())).await.unwrap();
        store.create_zinger(&Zinger::new(bob, "two".to_string())).await.unwrap();
        store.create_zinger(&Zinger::new(alice, "three".to_string())).await.unwrap();

        let all = store.list_zingers(None).await.unwrap();
        let by_alice = store.list_zingers(Some(alice)).await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(by_alice.len(), 2);
        assert!(by_alice.iter().all(|z| z.user_id == alice));
    }
}
