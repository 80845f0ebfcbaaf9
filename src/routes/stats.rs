use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;

use super::error_chain_fmt;
use crate::directory::{DirectoryError, SubscriberDirectory};

#[tracing::instrument(name = "Subscriber stats handler", skip(directory))]
pub async fn stats(
    directory: web::Data<dyn SubscriberDirectory>,
) -> Result<HttpResponse, StatsError> {
    let total = directory.count_active().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "totalActiveSubscribers": total,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

#[derive(thiserror::Error)]
pub enum StatsError {
    #[error("Failed to load subscriber stats.")]
    StoreError(#[from] DirectoryError),
}

impl std::fmt::Debug for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for StatsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
