use actix_web::{http::header::ContentType, web, HttpResponse};

use crate::middleware::VisitCounter;

/// GET /admin/metrics
pub async fn metrics(counter: web::Data<VisitCounter>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, ZingZing Admin</h1>
    <p>ZingZing has been visited {} times!</p>
  </body>
</html>"#,
        counter.get()
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// POST /admin/reset
pub async fn reset(counter: web::Data<VisitCounter>) -> HttpResponse {
    counter.reset();
    tracing::info!("Visit counter reset");

    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("OK")
}
