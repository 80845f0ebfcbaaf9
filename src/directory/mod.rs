mod memory;
mod postgres;

pub use memory::InMemorySubscriberDirectory;
pub use postgres::PostgresSubscriberDirectory;

use async_trait::async_trait;

use crate::domain::{subscriber::Subscriber, subscriber_email::SubscriberEmail};

#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    #[error("{0} is already subscribed.")]
    Duplicate(String),
    #[error("Failed to query the subscriber store.")]
    Store(#[source] sqlx::Error),
}

/// Narrow query/mutate contract over the external subscriber store.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    /// Returns `false` when no record matches, whatever its active flag.
    async fn exists(&self, email: &SubscriberEmail) -> Result<bool, DirectoryError>;

    async fn find(&self, email: &SubscriberEmail) -> Result<Option<Subscriber>, DirectoryError>;

    /// Fails with `DirectoryError::Duplicate` if the email is already stored.
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscriber, DirectoryError>;

    /// Updating an unknown email is a no-op.
    async fn set_active(&self, email: &SubscriberEmail, active: bool)
        -> Result<(), DirectoryError>;

    /// Active emails, oldest subscription first.
    async fn list_active(&self) -> Result<Vec<SubscriberEmail>, DirectoryError>;

    async fn count_active(&self) -> Result<i64, DirectoryError>;
}
