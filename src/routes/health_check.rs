use actix_web::HttpResponse;

/// Liveness probe. Answers without touching the store or the event feeds.
#[tracing::instrument(name = "Health Check handler")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
