use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

use super::{sample_events, EventSource, FetchError};
use crate::config::EventSourceSettings;
use crate::domain::event::Event;

const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Event source backed by an ordered list of HTTP feeds. The first feed that
/// answers with events wins; the others are not contacted.
pub struct HttpEventSource {
    http_client: Client,
    endpoints: Vec<String>,
    api_token: Option<Secret<String>>,
    page_size: usize,
}

impl HttpEventSource {
    pub fn new(settings: &EventSourceSettings) -> Result<HttpEventSource, reqwest::Error> {
        let http_client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.get_timeout())
            .build()?;

        Ok(HttpEventSource {
            http_client,
            endpoints: settings.endpoints.clone(),
            api_token: settings.get_api_token(),
            page_size: settings.page_size,
        })
    }

    #[tracing::instrument(name = "Fetching events from an endpoint", skip(self))]
    async fn fetch_from(&self, endpoint: &str) -> Result<Vec<Event>, FetchError> {
        let mut request = self
            .http_client
            .get(endpoint)
            .header(header::ACCEPT, ACCEPT_HEADER)
            .query(&[("per_page", self.page_size)]);

        if let Some(api_token) = &self.api_token {
            request = request.bearer_auth(api_token.expose_secret());
        }

        let response = request.send().await.map_err(FetchError::Request)?;

        match response.status() {
            StatusCode::FORBIDDEN => return Err(FetchError::RateLimited),
            StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
            status if !status.is_success() => return Err(FetchError::UnexpectedStatus(status)),
            _ => {}
        }

        let events: Vec<Event> = response.json().await.map_err(FetchError::Decode)?;

        if events.is_empty() {
            return Err(FetchError::Empty);
        }

        Ok(self.select(events))
    }

    // Keeps the interesting kinds unless that would leave nothing.
    fn select(&self, events: Vec<Event>) -> Vec<Event> {
        let interesting: Vec<Event> = events
            .iter()
            .filter(|event| event.kind.is_interesting())
            .cloned()
            .collect();

        let mut selected = if interesting.is_empty() {
            events
        } else {
            interesting
        };
        selected.truncate(self.page_size);

        selected
    }

    async fn first_success(&self) -> Result<Vec<Event>, FetchError> {
        let mut last_error = FetchError::NoEndpoints;

        for endpoint in &self.endpoints {
            match self.fetch_from(endpoint).await {
                Ok(events) => {
                    tracing::info!("Fetched {} events from {}", events.len(), endpoint);
                    return Ok(events);
                }
                Err(err @ (FetchError::RateLimited | FetchError::Unauthorized)) => {
                    tracing::warn!("Skipping {}: {}", endpoint, err);
                    last_error = err;
                }
                Err(err) => {
                    tracing::warn!("Skipping {}: {:?}", endpoint, err);
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }

    fn sample(&self) -> Vec<Event> {
        let mut rng = rand::thread_rng();

        sample_events(self.page_size, Utc::now(), &mut rng)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    #[tracing::instrument(name = "Fetching recent events", skip(self))]
    async fn fetch_events(&self) -> Vec<Event> {
        match self.first_success().await {
            Ok(events) => events,
            Err(err) => {
                tracing::error!(
                    "Every event feed failed, falling back to sample events. Last error: {:?}",
                    err
                );
                self.sample()
            }
        }
    }

    async fn probe(&self) -> Result<Vec<Event>, FetchError> {
        self.first_success().await
    }
}
