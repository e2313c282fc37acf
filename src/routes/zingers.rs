/// Zinger Routes
///
/// Create, list, fetch and delete zingers. Listing and fetching are public;
/// creating needs an access token and deleting is restricted to the author.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authorize_ownership, AuthenticatedUser};
use crate::censor::censor_zinger;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::store::{Zinger, ZingerStore};
use crate::validators::validate_zinger_body;

#[derive(Deserialize)]
pub struct CreateZingerRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ListZingersQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct ZingerResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub user_id: String,
}

impl From<&Zinger> for ZingerResponse {
    fn from(zinger: &Zinger) -> Self {
        Self {
            id: zinger.id.to_string(),
            created_at: zinger.created_at.to_rfc3339(),
            updated_at: zinger.updated_at.to_rfc3339(),
            body: zinger.body.clone(),
            user_id: zinger.user_id.to_string(),
        }
    }
}

/// POST /api/zingers
///
/// # Errors
/// - 400: empty body or longer than 140 characters
/// - 401: missing or invalid access token
pub async fn create_zinger(
    auth: AuthenticatedUser,
    form: web::Json<CreateZingerRequest>,
    zingers: web::Data<dyn ZingerStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("zinger_creation").with_user_id(auth.user_id);

    validate_zinger_body(&form.body)?;
    let zinger = Zinger::new(auth.user_id, censor_zinger(&form.body));

    zingers.create_zinger(&zinger).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(
        request_id = %context.request_id,
        zinger_id = %zinger.id,
        "Zinger created"
    );

    Ok(HttpResponse::Created().json(ZingerResponse::from(&zinger)))
}

/// GET /api/zingers
///
/// `author_id` filters by author when it is a valid id and is ignored
/// otherwise. `sort=desc` lists newest first; anything else oldest first.
pub async fn list_zingers(
    query: web::Query<ListZingersQuery>,
    zingers: web::Data<dyn ZingerStore>,
) -> Result<HttpResponse, AppError> {
    let author_id = query
        .author_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok());

    let mut found = zingers.list_zingers(author_id).await?;
    if query.sort.as_deref() == Some("desc") {
        found.reverse();
    }

    let body: Vec<ZingerResponse> = found.iter().map(ZingerResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/zingers/{zinger_id}
///
/// # Errors
/// - 400: malformed id
/// - 404: no such zinger
pub async fn get_zinger(
    path: web::Path<Uuid>,
    zingers: web::Data<dyn ZingerStore>,
) -> Result<HttpResponse, AppError> {
    let zinger_id = path.into_inner();

    let zinger = zingers
        .find_zinger(zinger_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("zinger {}", zinger_id)))?;

    Ok(HttpResponse::Ok().json(ZingerResponse::from(&zinger)))
}

/// DELETE /api/zingers/{zinger_id}
///
/// # Errors
/// - 400: malformed id
/// - 401: missing or invalid access token
/// - 403: the caller is not the author
/// - 404: no such zinger
pub async fn delete_zinger(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    zingers: web::Data<dyn ZingerStore>,
) -> Result<HttpResponse, AppError> {
    let zinger_id = path.into_inner();
    let context = ErrorContext::new("zinger_deletion").with_user_id(auth.user_id);

    let zinger = zingers
        .find_zinger(zinger_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("zinger {}", zinger_id)))?;

    if !authorize_ownership(auth.user_id, zinger.user_id) {
        let err = AppError::Auth(AuthError::Forbidden {
            user_id: auth.user_id.to_string(),
            resource_id: zinger_id.to_string(),
        });
        context.log_error(&err);
        return Err(err);
    }

    if !zingers.delete_zinger(zinger_id).await? {
        return Err(DatabaseError::NotFound(format!("zinger {}", zinger_id)).into());
    }

    tracing::info!(
        request_id = %context.request_id,
        zinger_id = %zinger_id,
        "Zinger deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
