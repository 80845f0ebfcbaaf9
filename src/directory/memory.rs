use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{DirectoryError, SubscriberDirectory};
use crate::domain::{subscriber::Subscriber, subscriber_email::SubscriberEmail};

/// Directory kept in process memory. Records are held in signup order.
#[derive(Default)]
pub struct InMemorySubscriberDirectory {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl InMemorySubscriberDirectory {
    pub fn new() -> InMemorySubscriberDirectory {
        InMemorySubscriberDirectory::default()
    }

    /// Every stored record, active or not.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        self.subscribers.lock().await.clone()
    }
}

#[async_trait]
impl SubscriberDirectory for InMemorySubscriberDirectory {
    async fn exists(&self, email: &SubscriberEmail) -> Result<bool, DirectoryError> {
        let subscribers = self.subscribers.lock().await;

        Ok(subscribers.iter().any(|s| &s.email == email))
    }

    async fn find(&self, email: &SubscriberEmail) -> Result<Option<Subscriber>, DirectoryError> {
        let subscribers = self.subscribers.lock().await;

        Ok(subscribers.iter().find(|s| &s.email == email).cloned())
    }

    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscriber, DirectoryError> {
        let mut subscribers = self.subscribers.lock().await;

        if subscribers.iter().any(|s| &s.email == email) {
            return Err(DirectoryError::Duplicate(email.to_string()));
        }

        let subscriber = Subscriber::new(email.clone());
        subscribers.push(subscriber.clone());

        Ok(subscriber)
    }

    async fn set_active(
        &self,
        email: &SubscriberEmail,
        active: bool,
    ) -> Result<(), DirectoryError> {
        let mut subscribers = self.subscribers.lock().await;

        if let Some(subscriber) = subscribers.iter_mut().find(|s| &s.email == email) {
            subscriber.is_active = active;
            subscriber.updated_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<SubscriberEmail>, DirectoryError> {
        let subscribers = self.subscribers.lock().await;

        Ok(subscribers
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.email.clone())
            .collect())
    }

    async fn count_active(&self) -> Result<i64, DirectoryError> {
        let subscribers = self.subscribers.lock().await;

        Ok(subscribers.iter().filter(|s| s.is_active).count() as i64)
    }
}
