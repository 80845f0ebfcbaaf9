use chrono::NaiveTime;
use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use std::time;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::scheduler::parse_daily_at;

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub event_source: EventSourceSettings,
    pub broadcast: BroadcastSettings,
    pub scheduler: SchedulerSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Label reported by the root endpoint
    pub environment: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub subject: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    // secrecy protects secret information and prevents them to be exposed (eg: via logs)
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub name: String,
    pub require_ssl: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct EventSourceSettings {
    /// Candidate feeds, tried in order until one answers
    pub endpoints: Vec<String>,
    pub user_agent: String,
    // Without a token the upstream applies its lower anonymous rate limit
    #[serde(default)]
    pub api_token: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct BroadcastSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub send_delay_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct SchedulerSettings {
    pub enabled: bool,
    /// Time of day in UTC, formatted as HH:MM
    pub daily_at: String,
}

impl Settings {
    /// Checks the values that can only be validated once everything is merged.
    pub fn validate(&self) -> Result<(), String> {
        self.get_email_client_sender()?;
        self.scheduler.get_daily_at()?;

        if self.event_source.endpoints.is_empty() {
            return Err(String::from(
                "At least one event source endpoint must be configured.",
            ));
        }

        if self.event_source.page_size == 0 {
            return Err(String::from("Event source page size must be positive."));
        }

        let has_scheme =
            |origin: &&String| origin.starts_with("http://") || origin.starts_with("https://");

        if let Some(origin) = self
            .application
            .allowed_origins
            .iter()
            .find(|origin| origin.as_str() != "*" && !has_scheme(origin))
        {
            return Err(format!("{} is not a valid allowed origin.", origin));
        }

        Ok(())
    }

    pub fn get_address(&self) -> String {
        format!(
            "{}:{}",
            self.application.get_host(),
            self.application.get_port()
        )
    }

    pub fn get_environment_label(&self) -> String {
        self.application.environment.clone()
    }

    pub fn get_db_options(&self) -> PgConnectOptions {
        self.database.get_db_options()
    }

    pub fn get_email_client_sender(&self) -> Result<SubscriberEmail, String> {
        self.email_client.get_sender_email()
    }

    pub fn get_email_client_base_url(&self) -> String {
        self.email_client.get_base_url()
    }

    pub fn get_email_client_api(&self) -> Secret<String> {
        self.email_client.get_api_key()
    }

    pub fn get_email_client_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.email_client.timeout_milliseconds)
    }

    pub fn set_email_client_base_url(&mut self, new_base_url: String) {
        self.email_client.set_base_url(new_base_url)
    }

    pub fn set_event_source_endpoints(&mut self, endpoints: Vec<String>) {
        self.event_source.endpoints = endpoints;
    }

    pub fn get_send_delay(&self) -> time::Duration {
        time::Duration::from_millis(self.broadcast.send_delay_milliseconds)
    }

    pub fn set_send_delay_milliseconds(&mut self, delay: u64) {
        self.broadcast.send_delay_milliseconds = delay;
    }

    pub fn set_scheduler_enabled(&mut self, enabled: bool) {
        self.scheduler.enabled = enabled;
    }

    pub fn set_app_port(&mut self, port: u16) {
        self.application.port = port;
    }
}

impl DatabaseSettings {
    pub fn get_db_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        let mut db_options = PgConnectOptions::new()
            .host(&self.host)
            .password(self.password.expose_secret())
            .username(&self.username)
            .port(self.port)
            .database(&self.name)
            .ssl_mode(ssl_mode);

        db_options.log_statements(tracing::log::LevelFilter::Trace);

        db_options
    }
}

impl ApplicationSettings {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_host(&self) -> String {
        self.host.clone()
    }
}

impl EmailClientSettings {
    pub fn get_sender_email(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender_email.clone())
    }

    pub fn get_base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn get_api_key(&self) -> Secret<String> {
        self.api_key.clone()
    }

    pub fn set_base_url(&mut self, new_base_url: String) {
        self.base_url = new_base_url
    }
}

impl EventSourceSettings {
    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }

    /// A blank token (e.g. an empty env override) means unauthenticated access.
    pub fn get_api_token(&self) -> Option<Secret<String>> {
        self.api_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
            .cloned()
    }
}

impl SchedulerSettings {
    pub fn get_daily_at(&self) -> Result<NaiveTime, String> {
        parse_daily_at(&self.daily_at)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir()
        .map_err(|err| {
            ConfigError::Message(format!(
                "Failed to determine the current directory: {}",
                err
            ))
        })?;
    let config_directory = root_path.join("config");
    // Uses development environment by default
    let enviroment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(enviroment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let settings = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_APPLICATION__PORT would set Settings.application.port
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?;

    tracing::info!("Application environment = {:?}", enviroment);

    let settings: Settings = settings.try_deserialize()?;

    settings.validate().map_err(ConfigError::Message)?;

    Ok(settings)
}
