/// ZingPay webhook
///
/// ZingPay calls this endpoint with `Authorization: ApiKey <key>` when a user
/// pays. Only `user.upgraded` has an effect; other events are acknowledged.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::ZingPayCaller;
use crate::error::{AppError, DatabaseError, ErrorContext, ValidationError};
use crate::store::UserStore;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: String,
}

/// POST /api/zingpay/webhooks
///
/// # Errors
/// - 401: missing or wrong API key, checked before the body is read
/// - 400: malformed body or `user_id` is not a valid id
/// - 404: no user with that id
pub async fn zingpay_webhook(
    _caller: ZingPayCaller,
    form: web::Json<WebhookEvent>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("zingpay_webhook");

    if form.event != USER_UPGRADED {
        tracing::debug!(event = %form.event, "Ignoring ZingPay event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&form.data.user_id)
        .map_err(|_| ValidationError::InvalidFormat("user_id".to_string()))?;

    if !users.upgrade_to_premium(user_id, Utc::now()).await? {
        let err = AppError::Database(DatabaseError::NotFound(format!("user {}", user_id)));
        context.log_error(&err);
        return Err(err);
    }

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "User upgraded to premium"
    );

    Ok(HttpResponse::NoContent().finish())
}
