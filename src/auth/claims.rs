/// JWT Claims structure
///
/// Payload of an access token: the registered claims only (RFC 7519).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::TokenError;

/// Issuer written into and required from every access token
pub const TOKEN_ISSUER: &str = "zingery";

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `user_id` valid for `ttl` from now
    pub fn new(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `TokenError::MalformedSubject` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(TokenError::MalformedSubject)
    }

    /// A token is only valid while `now < exp`
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, chrono::Duration::hours(1));

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, chrono::Duration::hours(1));

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), chrono::Duration::hours(1));
        claims.sub = "invalid-uuid".to_string();

        assert!(matches!(claims.user_id(), Err(TokenError::MalformedSubject(_))));
    }

    #[test]
    fn test_zero_ttl_is_already_expired() {
        let claims = Claims::new(Uuid::new_v4(), chrono::Duration::zero());
        assert!(claims.is_expired());
    }
}
