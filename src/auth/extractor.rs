/// Authenticated caller extractors
///
/// Handlers that mutate state take an `AuthenticatedUser` argument; the
/// ZingPay webhook takes a `ZingPayCaller`. Extraction checks the
/// Authorization header and fails the request with 401 before the handler
/// runs. Listed ahead of `web::Json`, they also run before the body is parsed.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::guard::{api_key_matches, authorize, extract_api_key};
use crate::configuration::{JwtSettings, WebhookSettings};
use crate::error::{AppError, AuthError};

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let jwt_config = match req.app_data::<web::Data<JwtSettings>>() {
            Some(config) => config,
            None => {
                return ready(Err(AppError::Internal(
                    "JWT settings are not registered".to_string(),
                )))
            }
        };

        let result = authorize(req.headers(), &jwt_config.secret)
            .map(|user_id| {
                tracing::debug!(user_id = %user_id, "JWT validated successfully");
                AuthenticatedUser { user_id }
            })
            .map_err(|e| {
                tracing::warn!(path = %req.path(), "JWT validation failed: {}", e);
                AppError::Auth(e)
            });

        ready(result)
    }
}

/// A request carrying the configured ZingPay API key
#[derive(Debug, Clone, Copy)]
pub struct ZingPayCaller;

impl FromRequest for ZingPayCaller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let webhook_config = match req.app_data::<web::Data<WebhookSettings>>() {
            Some(config) => config,
            None => {
                return ready(Err(AppError::Internal(
                    "webhook settings are not registered".to_string(),
                )))
            }
        };

        let result = extract_api_key(req.headers()).and_then(|presented| {
            if api_key_matches(presented, &webhook_config.api_key) {
                Ok(ZingPayCaller)
            } else {
                Err(AuthError::InvalidApiKey)
            }
        });

        ready(result.map_err(|e| {
            tracing::warn!(path = %req.path(), "Webhook authentication failed: {}", e);
            AppError::Auth(e)
        }))
    }
}
