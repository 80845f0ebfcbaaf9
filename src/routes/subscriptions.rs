use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use super::error_chain_fmt;
use crate::{
    directory::{DirectoryError, SubscriberDirectory},
    domain::{
        new_subscriber::{NewSubscriber, SubscriptionBody},
        subscriber::Subscriber,
        subscriber_email::SubscriberEmail,
    },
    email_client::EmailClient,
};

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, directory, email_client),
    fields(
        subscriber_email = ?body.email
    )
)]
pub async fn handle_signup(
    body: web::Json<SubscriptionBody>,
    directory: web::Data<dyn SubscriberDirectory>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, SignupError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(SignupError::ValidationError)?;

    let subscriber = match directory.find(&new_subscriber.email).await? {
        Some(existing) if existing.is_active => return Err(SignupError::AlreadySubscribed),
        Some(_) => reactivate(directory.get_ref(), &new_subscriber.email).await?,
        None => directory.insert(&new_subscriber.email).await?,
    };

    if let Err(err) = send_welcome_email(&email_client, &new_subscriber.email).await {
        // The subscription stands even if the welcome email is lost
        tracing::error!(
            "Failed to send a welcome email to {}: {:?}",
            new_subscriber.email,
            err
        );
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully subscribed to the newsletter!",
        "subscriber": subscriber,
    })))
}

/// Answers a body that cannot be read as `SubscriptionBody` the same way as an invalid email.
pub fn signup_body_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected signup body: {}", err);

    SignupError::ValidationError(err.to_string()).into()
}

#[tracing::instrument(name = "Reactivating a former subscriber", skip(directory))]
async fn reactivate(
    directory: &dyn SubscriberDirectory,
    email: &SubscriberEmail,
) -> Result<Subscriber, SignupError> {
    directory.set_active(email, true).await?;

    directory
        .find(email)
        .await?
        .ok_or(SignupError::SubscriberVanished)
}

#[tracing::instrument(name = "Send a welcome email to a new subscriber", skip(email_client))]
async fn send_welcome_email(
    email_client: &EmailClient,
    email: &SubscriberEmail,
) -> Result<(), reqwest::Error> {
    let text_body = "Welcome to the activity digest!\n\
        Every day you will receive a short summary of what is happening on GitHub.";
    let html_body = r#"
            <div>
                <h1>Welcome to the activity digest!</h1>
                <p>Every day you will receive a short summary of what is happening on GitHub.</p>
            </div>
        "#;

    email_client
        .send_email(email, "Welcome to the activity digest", html_body, text_body)
        .await
}

#[derive(thiserror::Error)]
pub enum SignupError {
    #[error("Please provide a valid email address")]
    ValidationError(String),
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error("Failed to save the subscriber.")]
    StoreError(#[source] DirectoryError),
    #[error("Failed to save the subscriber.")]
    SubscriberVanished,
}

impl From<DirectoryError> for SignupError {
    fn from(err: DirectoryError) -> Self {
        match err {
            // Lost a race against a concurrent signup for the same email
            DirectoryError::Duplicate(_) => SignupError::AlreadySubscribed,
            err => SignupError::StoreError(err),
        }
    }
}

impl std::fmt::Debug for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SignupError {
    fn status_code(&self) -> StatusCode {
        match self {
            SignupError::ValidationError(_) | SignupError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            SignupError::StoreError(_) | SignupError::SubscriberVanished => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
