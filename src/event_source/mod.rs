mod http;
mod sample;

pub use http::HttpEventSource;
pub use sample::sample_events;

use async_trait::async_trait;

use crate::domain::event::Event;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("The event feed rate-limited the request.")]
    RateLimited,
    #[error("The event feed rejected the credentials.")]
    Unauthorized,
    #[error("The event feed answered with status {0}.")]
    UnexpectedStatus(reqwest::StatusCode),
    #[error("Failed to reach the event feed.")]
    Request(#[source] reqwest::Error),
    #[error("Failed to decode the event feed response.")]
    Decode(#[source] reqwest::Error),
    #[error("The event feed returned no events.")]
    Empty,
    #[error("No event feed endpoint is configured.")]
    NoEndpoints,
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Recent events, most recent first. Falls back to sample data, so this
    /// never fails and never returns an empty list.
    async fn fetch_events(&self) -> Vec<Event>;

    /// Live events only. Reports the last failure when every endpoint failed.
    async fn probe(&self) -> Result<Vec<Event>, FetchError>;
}
