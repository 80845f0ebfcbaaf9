use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::directory::{DirectoryError, SubscriberDirectory};
use crate::dispatcher::DigestDispatcher;
use crate::domain::{digest::Digest, subscriber_email::SubscriberEmail};
use crate::event_source::EventSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CycleSummary {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

#[derive(Debug)]
pub struct DispatchResult {
    pub recipient: SubscriberEmail,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum BroadcastError {
    #[error("A broadcast cycle is already in progress.")]
    CycleInProgress,
    #[error("Failed to load the active subscribers.")]
    Directory(#[from] DirectoryError),
    #[error("Failed to render the digest.")]
    Render(#[from] askama::Error),
}

impl CycleSummary {
    pub fn from_results(results: &[DispatchResult]) -> CycleSummary {
        let sent = results.iter().filter(|result| result.success).count();

        CycleSummary {
            sent,
            failed: results.len() - sent,
            total: results.len(),
        }
    }
}

/// Fetches one digest and sends it to every active subscriber, one at a time.
pub struct Broadcaster {
    directory: Arc<dyn SubscriberDirectory>,
    event_source: Arc<dyn EventSource>,
    dispatcher: Arc<dyn DigestDispatcher>,
    send_delay: Duration,
    // Held for the whole cycle so a manual trigger cannot overlap the scheduled one
    in_flight: Mutex<()>,
}

impl Broadcaster {
    pub fn new(
        directory: Arc<dyn SubscriberDirectory>,
        event_source: Arc<dyn EventSource>,
        dispatcher: Arc<dyn DigestDispatcher>,
        send_delay: Duration,
    ) -> Broadcaster {
        Broadcaster {
            directory,
            event_source,
            dispatcher,
            send_delay,
            in_flight: Mutex::new(()),
        }
    }

    #[tracing::instrument(name = "Running a broadcast cycle", skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleSummary, BroadcastError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| BroadcastError::CycleInProgress)?;

        let recipients = self.directory.list_active().await?;

        if recipients.is_empty() {
            tracing::info!("No active subscribers, skipping the event fetch");
            return Ok(CycleSummary::default());
        }

        let events = self.event_source.fetch_events().await;
        let digest = Digest::from_events(&events)?;

        let mut results = Vec::with_capacity(recipients.len());

        for (index, recipient) in recipients.into_iter().enumerate() {
            if index > 0 {
                self.pause().await;
            }

            results.push(self.dispatch(recipient, &digest).await);
        }

        let summary = CycleSummary::from_results(&results);

        tracing::info!(
            sent = summary.sent,
            failed = summary.failed,
            total = summary.total,
            "Broadcast cycle finished"
        );

        Ok(summary)
    }

    async fn dispatch(&self, recipient: SubscriberEmail, digest: &Digest) -> DispatchResult {
        match self.dispatcher.send(&recipient, digest).await {
            Ok(()) => {
                tracing::info!("Digest delivered to {}", recipient);

                DispatchResult {
                    recipient,
                    success: true,
                    error: None,
                }
            }
            Err(err) => {
                tracing::error!("Failed to deliver the digest to {}: {:?}", recipient, err);

                DispatchResult {
                    recipient,
                    success: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    async fn pause(&self) {
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
    }
}
