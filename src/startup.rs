use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::{CredentialHasher, SessionManager};
use crate::configuration::Settings;
use crate::error::{AppError, ValidationError};
use crate::middleware::{VisitCounter, VisitCounterMiddleware};
use crate::routes::{
    create_zinger, delete_zinger, get_zinger, health_check, list_zingers, login, metrics,
    refresh, register, reset, revoke, update_user, zingpay_webhook,
};
use crate::store::Repositories;

fn malformed_request(detail: String) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedRequest(detail)).into()
}

pub fn run(
    listener: TcpListener,
    repositories: Repositories,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let hasher = CredentialHasher::new(settings.application.bcrypt_cost);
    let sessions = web::Data::new(SessionManager::new(
        repositories.users.clone(),
        repositories.refresh_tokens.clone(),
        hasher,
        settings.jwt.clone(),
    ));
    let users = web::Data::from(repositories.users);
    let zingers = web::Data::from(repositories.zingers);
    let hasher = web::Data::new(hasher);
    let jwt_config = web::Data::new(settings.jwt);
    let webhook_config = web::Data::new(settings.webhook);
    let visits = web::Data::new(VisitCounter::new());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())

            // Shared state
            .app_data(sessions.clone())
            .app_data(users.clone())
            .app_data(zingers.clone())
            .app_data(hasher.clone())
            .app_data(jwt_config.clone())
            .app_data(webhook_config.clone())
            .app_data(visits.clone())

            // Extraction failures answer 400 with the JSON error body
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| malformed_request(err.to_string())),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _req| malformed_request(err.to_string())),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| malformed_request(err.to_string())),
            )

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .service(
                        web::resource("/users")
                            .route(web::post().to(register))
                            .route(web::put().to(update_user)),
                    )
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .service(
                        web::resource("/zingers")
                            .route(web::post().to(create_zinger))
                            .route(web::get().to(list_zingers)),
                    )
                    .service(
                        web::resource("/zingers/{zinger_id}")
                            .route(web::get().to(get_zinger))
                            .route(web::delete().to(delete_zinger)),
                    )
                    .route("/zingpay/webhooks", web::post().to(zingpay_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )
            .service(
                web::scope("/app")
                    .wrap(VisitCounterMiddleware::new(visits.clone()))
                    .service(fs::Files::new("", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
