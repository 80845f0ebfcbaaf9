use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use super::error_chain_fmt;
use crate::broadcast::{BroadcastError, Broadcaster};

#[tracing::instrument(name = "Sending the digest to all subscribers", skip(broadcaster))]
pub async fn send_updates(
    broadcaster: web::Data<Broadcaster>,
) -> Result<HttpResponse, SendUpdatesError> {
    let summary = broadcaster.run_cycle().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Updates sent",
        "total": summary.total,
        "sent": summary.sent,
        "failed": summary.failed,
    })))
}

#[derive(thiserror::Error)]
pub enum SendUpdatesError {
    #[error("A broadcast is already running, try again later.")]
    AlreadyRunning,
    #[error("Failed to send updates.")]
    UnexpectedError(#[source] BroadcastError),
}

impl From<BroadcastError> for SendUpdatesError {
    fn from(err: BroadcastError) -> Self {
        match err {
            BroadcastError::CycleInProgress => SendUpdatesError::AlreadyRunning,
            err => SendUpdatesError::UnexpectedError(err),
        }
    }
}

impl std::fmt::Debug for SendUpdatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendUpdatesError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendUpdatesError::AlreadyRunning => StatusCode::CONFLICT,
            SendUpdatesError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
