/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{extract_bearer, SessionManager};
use crate::error::{AppError, ErrorContext};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the user profile plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
    pub is_premium: bool,
}

/// Response to a successful refresh
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: unknown email or wrong password, with the same body for both
/// - 500: internal server error
///
/// The email is not format-checked here so that a malformed address fails
/// the same way as an unknown one.
pub async fn login(
    form: web::Json<LoginRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let outcome = sessions
        .login(form.email.trim(), &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    let user = outcome.user;
    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "Session opened"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: user.id.to_string(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
        email: user.email,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
        is_premium: user.is_premium,
    }))
}

/// POST /api/refresh
///
/// Takes the refresh token as `Authorization: Bearer <refresh_token>` and
/// returns a new access token. The refresh token stays valid.
///
/// # Errors
/// - 401: missing, unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let refresh_token = extract_bearer(req.headers())?;
    let token = sessions.refresh(refresh_token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Revokes the refresh token sent as `Authorization: Bearer <refresh_token>`.
/// Revoking an already revoked or unknown token still answers 204.
///
/// # Errors
/// - 401: missing Authorization header
pub async fn revoke(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    let refresh_token = extract_bearer(req.headers())?;
    sessions.revoke(refresh_token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::NoContent().finish())
}
