use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use std::sync::Arc;

use crate::broadcast::{Broadcaster, CycleSummary};

/// Parses a `HH:MM` time of day.
pub fn parse_daily_at(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("{} is not a valid HH:MM time of day: {}", raw, err))
}

/// Next instant strictly after `from` whose UTC time of day is `at`.
pub fn next_run_after(from: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let candidate = Utc.from_utc_datetime(&from.naive_utc().date().and_time(at));

    if candidate > from {
        candidate
    } else {
        // Today's window has passed
        candidate + Duration::days(1)
    }
}

/// Fires one broadcast cycle per day at a fixed UTC time.
pub struct DailyScheduler {
    broadcaster: Arc<Broadcaster>,
    at: NaiveTime,
}

impl DailyScheduler {
    pub fn new(broadcaster: Arc<Broadcaster>, at: NaiveTime) -> DailyScheduler {
        DailyScheduler { broadcaster, at }
    }

    pub async fn run_until_stopped(self) {
        loop {
            let now = Utc::now();
            let next_run = next_run_after(now, self.at);
            let wait = (next_run - now).to_std().unwrap_or_default();

            tracing::info!("Next broadcast cycle scheduled at {}", next_run.to_rfc3339());

            tokio::time::sleep(wait).await;
            self.fire().await;
        }
    }

    /// Runs one cycle on its own task so that neither an error nor a panic
    /// reaches the scheduling loop.
    pub async fn fire(&self) -> Option<CycleSummary> {
        let broadcaster = self.broadcaster.clone();

        match tokio::spawn(async move { broadcaster.run_cycle().await }).await {
            Ok(Ok(summary)) => {
                tracing::info!(
                    "Scheduled broadcast finished: {} sent, {} failed, {} total",
                    summary.sent,
                    summary.failed,
                    summary.total
                );
                Some(summary)
            }
            Ok(Err(err)) => {
                tracing::error!("Scheduled broadcast failed: {:?}", err);
                None
            }
            Err(err) => {
                tracing::error!("Scheduled broadcast panicked: {:?}", err);
                None
            }
        }
    }
}
