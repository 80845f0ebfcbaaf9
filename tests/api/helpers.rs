use once_cell::sync::Lazy;
use reqwest::Response;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use activity_digest_newsletter::{
    config::get_configuration,
    directory::InMemorySubscriberDirectory,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

// Logs are only printed when TEST_LOG is set, e.g. `TEST_LOG=true cargo test`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = String::from("info");
    let subscriber_name = String::from("test");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub directory: Arc<InMemorySubscriberDirectory>,
    pub email_server: MockServer,
    pub events_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let email_server = MockServer::start().await;
        let events_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_email_client_base_url(email_server.uri());
        config.set_event_source_endpoints(vec![
            format!("{}/events", events_server.uri()),
            format!("{}/users/octocat/events/public", events_server.uri()),
        ]);
        config.set_send_delay_milliseconds(0);
        config.set_scheduler_enabled(false);

        let directory = Arc::new(InMemorySubscriberDirectory::new());

        let application = Application::build_with_directory(config, directory.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            directory,
            email_server,
            events_server,
            api_client: reqwest::Client::new(),
        }
    }

    pub async fn post_signup(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/signup", body).await
    }

    pub async fn post_unsubscribe(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/unsubscribe", body).await
    }

    pub async fn post_send_updates(&self) -> Response {
        self.api_client
            .post(&format!("{}/api/send-updates", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, route: &str) -> Response {
        self.api_client
            .get(&format!("{}{}", self.address, route))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Posts `body` verbatim as JSON, or nothing at all when `body` is `None`.
    pub async fn post_raw(&self, route: &str, body: Option<&str>) -> Response {
        let request = self.api_client.post(&format!("{}{}", self.address, route));
        let request = match body {
            Some(body) => request
                .header("Content-Type", "application/json")
                .body(body.to_owned()),
            None => request,
        };

        request.send().await.expect("Failed to execute request.")
    }

    /// Signs up every email while a scoped mock swallows the welcome emails.
    pub async fn signup_subscribers(&self, emails: &[&str]) {
        let _mock_guard = Mock::given(path("/mail/send"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .named("Welcome emails")
            .expect(emails.len() as u64)
            .mount_as_scoped(&self.email_server)
            .await;

        for email in emails {
            let response = self
                .post_signup(serde_json::json!({ "email": email }))
                .await;

            assert_eq!(200, response.status().as_u16());
        }
    }

    async fn post_json(&self, route: &str, body: serde_json::Value) -> Response {
        self.api_client
            .post(&format!("{}{}", self.address, route))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Upstream feed body with `count` push events.
pub fn github_events(count: usize) -> serde_json::Value {
    let events: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": i.to_string(),
                "type": "PushEvent",
                "actor": { "id": i, "login": format!("dev-{}", i) },
                "repo": { "id": i, "name": format!("octo/repo-{}", i) },
                "payload": {},
                "public": true,
                "created_at": "2024-03-01T10:00:00Z"
            })
        })
        .collect();

    serde_json::Value::Array(events)
}
