/// Session lifecycle: login, refresh and revoke
///
/// Refresh token states:
///
/// ```text
///   Active --revoke--> Revoked   (terminal)
///   Active --time----> Expired   (terminal)
/// ```

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{CredentialHasher, PasswordError};
use crate::auth::refresh_token::{generate_refresh_token, RefreshTokenState};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{RefreshTokenStore, User, UserStore};

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct SessionManager {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    hasher: CredentialHasher,
    jwt: JwtSettings,
    /// Verified against on unknown emails so both login failures cost one
    /// bcrypt verification at the configured cost
    dummy_hash: Option<String>,
}

const DUMMY_PASSWORD: &str = "zingzing-timing-equalizer";

impl SessionManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        hasher: CredentialHasher,
        jwt: JwtSettings,
    ) -> Self {
        let dummy_hash = match hasher.hash(DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::error!("Failed to prepare login timing hash: {}", e);
                None
            }
        };

        Self {
            users,
            refresh_tokens,
            hasher,
            jwt,
            dummy_hash,
        }
    }

    /// Verify credentials and open a session
    ///
    /// # Errors
    /// - `AuthError::InvalidCredentials` for an unknown email or a wrong
    ///   password; both look the same to the caller
    /// - Internal/database errors for hashing or store failures
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = match self.users.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email");
                if let Some(dummy_hash) = &self.dummy_hash {
                    let _ = self
                        .hasher
                        .verify_blocking(dummy_hash.clone(), password.to_string())
                        .await;
                }
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        match self
            .hasher
            .verify_blocking(user.hashed_password.clone(), password.to_string())
            .await
        {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e.into()),
        }

        let access_token = generate_access_token(user.id, &self.jwt.secret, self.access_ttl())?;

        let refresh_token = generate_refresh_token();
        let now = Utc::now();
        self.refresh_tokens
            .insert_refresh_token(&refresh_token, user.id, now, now + self.refresh_ttl())
            .await?;

        tracing::info!(user_id = %user.id, "User logged in successfully");

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from a refresh token. The refresh token itself
    /// is left as is.
    ///
    /// # Errors
    /// `AuthError::RefreshTokenRejected` if the token is unknown, revoked
    /// (at any timestamp), expired, or its user no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .refresh_tokens
            .find_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AuthError::RefreshTokenRejected("unknown refresh token".to_string()))?;

        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => {}
            RefreshTokenState::Revoked => {
                tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
                return Err(AuthError::RefreshTokenRejected("revoked".to_string()).into());
            }
            RefreshTokenState::Expired => {
                tracing::info!(user_id = %record.user_id, "Refresh token expired");
                return Err(AuthError::RefreshTokenRejected("expired".to_string()).into());
            }
        }

        let user = self
            .refresh_tokens
            .find_user_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AuthError::RefreshTokenRejected("owner not found".to_string()))?;

        let access_token = generate_access_token(user.id, &self.jwt.secret, self.access_ttl())?;

        tracing::info!(user_id = %user.id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke a refresh token. Revoking twice, or revoking an unknown token,
    /// is not an error.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let found = self
            .refresh_tokens
            .revoke_refresh_token(refresh_token, Utc::now())
            .await?;

        if found {
            tracing::info!("Refresh token revoked");
        } else {
            tracing::warn!("Revoke requested for unknown refresh token");
        }
        Ok(())
    }

    fn access_ttl(&self) -> Duration {
        Duration::seconds(self.jwt.access_token_expiry)
    }

    fn refresh_ttl(&self) -> Duration {
        Duration::seconds(self.jwt.refresh_token_expiry)
    }
}
