/// User Routes
///
/// Registration and credential updates.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthenticatedUser, CredentialHasher};
use crate::error::{AppError, DatabaseError, ErrorContext};
use crate::store::{User, UserStore};
use crate::validators::{is_valid_email, validate_password};

/// Registration and update request body
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public user profile, never includes the password hash
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
    pub is_premium: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
            email: user.email.clone(),
            is_premium: user.is_premium,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email or weak password
/// - 500: email already registered ("User already exists")
/// - 500: hashing or store failure
pub async fn register(
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
    hasher: web::Data<CredentialHasher>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    validate_password(&form.password)?;
    let hashed_password = hasher.hash_blocking(form.password.clone()).await?;

    let user = User::new(email, hashed_password);
    users.create_user(&user).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// PUT /api/users
///
/// Replace the authenticated user's email and password.
///
/// # Errors
/// - 400: invalid email or weak password
/// - 401: missing or invalid access token
/// - 404: the token's user no longer exists
/// - 500: new email belongs to another user ("User already exists")
pub async fn update_user(
    auth: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
    hasher: web::Data<CredentialHasher>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(auth.user_id);

    let email = is_valid_email(&form.email)?;
    validate_password(&form.password)?;
    let hashed_password = hasher.hash_blocking(form.password.clone()).await?;

    let user = users
        .update_credentials(auth.user_id, &email, &hashed_password, Utc::now())
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?
        .ok_or_else(|| DatabaseError::NotFound(format!("user {}", auth.user_id)))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User credentials updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}
