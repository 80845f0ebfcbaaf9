pub mod broadcast;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod domain;
pub mod email_client;
pub mod event_source;
pub mod routes;
pub mod scheduler;
pub mod startup;
pub mod telemetry;
