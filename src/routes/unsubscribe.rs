use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use super::error_chain_fmt;
use crate::{
    directory::{DirectoryError, SubscriberDirectory},
    domain::{new_subscriber::SubscriptionBody, subscriber_email::SubscriberEmail},
};

#[tracing::instrument(
    name = "Unsubscribe handler",
    skip(body, directory),
    fields(
        subscriber_email = ?body.email
    )
)]
pub async fn handle_unsubscribe(
    body: web::Json<SubscriptionBody>,
    directory: web::Data<dyn SubscriberDirectory>,
) -> Result<HttpResponse, UnsubscribeError> {
    let email = match body.into_inner().email {
        Some(email) if !email.trim().is_empty() => email,
        _ => return Err(UnsubscribeError::MissingEmail),
    };
    let email = SubscriberEmail::parse(email).map_err(UnsubscribeError::ValidationError)?;

    // Unknown addresses get the same answer, so membership is not disclosed
    if directory.exists(&email).await? {
        directory.set_active(&email, false).await?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully unsubscribed from the newsletter",
    })))
}

/// An absent body counts as a missing email, anything else unreadable as an invalid one.
pub fn unsubscribe_body_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected unsubscribe body: {}", err);

    match err {
        JsonPayloadError::ContentType => UnsubscribeError::MissingEmail.into(),
        JsonPayloadError::Deserialize(ref json_err) if json_err.is_eof() => {
            UnsubscribeError::MissingEmail.into()
        }
        err => UnsubscribeError::ValidationError(err.to_string()).into(),
    }
}

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("Email is required")]
    MissingEmail,
    #[error("Please provide a valid email address")]
    ValidationError(String),
    #[error("Failed to unsubscribe.")]
    StoreError(#[from] DirectoryError),
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UnsubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::MissingEmail | UnsubscribeError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            UnsubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
