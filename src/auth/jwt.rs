/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed JWTs. Validation never tells the caller why a
/// token was rejected: every failure is the same `TokenError::Invalid`, with the
/// underlying reason kept in `detail` for logs.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::claims::{Claims, TOKEN_ISSUER};

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, wrong issuer, expired or unparseable.
    #[error("invalid JWT token")]
    Invalid { detail: String },
    /// Correctly signed token whose subject is not a user id.
    #[error("could not parse user id: {0}")]
    MalformedSubject(#[source] uuid::Error),
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Log-only description of the failure
    pub fn detail(&self) -> String {
        match self {
            TokenError::Invalid { detail } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Generate a new access token for a user
///
/// # Arguments
/// * `user_id` - User's UUID, stored as the subject
/// * `secret` - Symmetric signing secret
/// * `ttl` - Lifetime of the token from now
///
/// # Errors
/// Returns `TokenError::Signing` if encoding fails
pub fn generate_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Validate an access token and return the user it was issued for
///
/// # Errors
/// Returns `TokenError::Invalid` if the token is tampered with, signed with
/// another secret or algorithm, issued by someone else, or expired.
/// Returns `TokenError::MalformedSubject` if the subject is not a UUID.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("JWT validation error: {}", e);
            TokenError::Invalid {
                detail: e.to_string(),
            }
        })?;

    // jsonwebtoken accepts exp == now
    if claims.is_expired() {
        tracing::warn!(exp = claims.exp, "JWT validation error: token expired");
        return Err(TokenError::Invalid {
            detail: "token expired".to_string(),
        });
    }

    claims.user_id()
}
