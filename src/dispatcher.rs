use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{digest::Digest, subscriber_email::SubscriberEmail};
use crate::email_client::EmailClient;

#[derive(thiserror::Error, Debug)]
#[error("Failed to deliver the digest to {recipient}.")]
pub struct DeliveryError {
    pub recipient: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Hands a rendered digest to the transport for a single recipient. Never retries.
#[async_trait]
pub trait DigestDispatcher: Send + Sync {
    async fn send(&self, recipient: &SubscriberEmail, digest: &Digest)
        -> Result<(), DeliveryError>;
}

pub struct EmailDispatcher {
    email_client: Arc<EmailClient>,
    subject: String,
}

impl EmailDispatcher {
    pub fn new(email_client: Arc<EmailClient>, subject: String) -> EmailDispatcher {
        EmailDispatcher {
            email_client,
            subject,
        }
    }
}

#[async_trait]
impl DigestDispatcher for EmailDispatcher {
    async fn send(
        &self,
        recipient: &SubscriberEmail,
        digest: &Digest,
    ) -> Result<(), DeliveryError> {
        self.email_client
            .send_email(recipient, &self.subject, digest.html(), digest.text())
            .await
            .map_err(|err| DeliveryError {
                recipient: recipient.to_string(),
                source: Box::new(err),
            })
    }
}
