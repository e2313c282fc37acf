mod admin;
mod auth;
mod health_check;
mod users;
mod webhooks;
mod zingers;

pub use admin::{metrics, reset};
pub use auth::{login, refresh, revoke};
pub use health_check::health_check;
pub use users::{register, update_user};
pub use webhooks::zingpay_webhook;
pub use zingers::{create_zinger, delete_zinger, get_zinger, list_zingers};
