use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::broadcast::Broadcaster;
use crate::config::{DatabaseSettings, Settings};
use crate::directory::{PostgresSubscriberDirectory, SubscriberDirectory};
use crate::dispatcher::EmailDispatcher;
use crate::email_client::EmailClient;
use crate::event_source::{EventSource, HttpEventSource};
use crate::routes::{
    handle_signup, handle_unsubscribe, health_check, home, not_found, send_updates,
    signup_body_error, stats, test_db, test_github, unsubscribe_body_error,
};
use crate::scheduler::DailyScheduler;

/// Environment label reported by the root endpoint.
pub struct EnvironmentLabel(pub String);

pub struct Application {
    pub port: u16,
    pub server: Server,
    scheduler: Option<DailyScheduler>,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let directory = Arc::new(PostgresSubscriberDirectory::new(db_pool));

        Self::build_with_directory(config, directory).await
    }

    /// Builds the application around an already constructed subscriber directory.
    pub async fn build_with_directory(
        config: Settings,
        directory: Arc<dyn SubscriberDirectory>,
    ) -> Result<Self, std::io::Error> {
        let sender_email = config.get_email_client_sender().map_err(invalid_input)?;
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.get_email_client_api(),
            Some(config.get_email_client_timeout()),
        )
        .map_err(invalid_input)?;
        let email_client = Arc::new(email_client);

        let event_source: Arc<dyn EventSource> =
            Arc::new(HttpEventSource::new(&config.event_source).map_err(invalid_input)?);
        let dispatcher = Arc::new(EmailDispatcher::new(
            email_client.clone(),
            config.email_client.subject.clone(),
        ));
        let broadcaster = Arc::new(Broadcaster::new(
            directory.clone(),
            event_source.clone(),
            dispatcher,
            config.get_send_delay(),
        ));

        let scheduler = if config.scheduler.enabled {
            let daily_at = config.scheduler.get_daily_at().map_err(invalid_input)?;
            Some(DailyScheduler::new(broadcaster.clone(), daily_at))
        } else {
            None
        };

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            AppDependencies {
                directory,
                event_source,
                email_client,
                broadcaster,
                environment: EnvironmentLabel(config.get_environment_label()),
                allowed_origins: config.application.allowed_origins.clone(),
            },
        )?;

        Ok(Self {
            port,
            server,
            scheduler,
        })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        if let Some(scheduler) = self.scheduler {
            tokio::spawn(scheduler.run_until_stopped());
        }

        self.server.await
    }
}

/// Everything the request handlers need, owned and shared across workers.
pub struct AppDependencies {
    pub directory: Arc<dyn SubscriberDirectory>,
    pub event_source: Arc<dyn EventSource>,
    pub email_client: Arc<EmailClient>,
    pub broadcaster: Arc<Broadcaster>,
    pub environment: EnvironmentLabel,
    pub allowed_origins: Vec<String>,
}

pub fn run(listener: TcpListener, dependencies: AppDependencies) -> Result<Server, std::io::Error> {
    let directory: web::Data<dyn SubscriberDirectory> = web::Data::from(dependencies.directory);
    let event_source: web::Data<dyn EventSource> = web::Data::from(dependencies.event_source);
    let email_client = web::Data::from(dependencies.email_client);
    let broadcaster = web::Data::from(dependencies.broadcaster);
    let environment = web::Data::new(dependencies.environment);
    let allowed_origins = dependencies.allowed_origins;

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .wrap(cors(&allowed_origins))
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/test-db", web::get().to(test_db))
                    .route("/test-github", web::get().to(test_github))
                    .route("/stats", web::get().to(stats))
                    .service(
                        web::resource("/signup")
                            .app_data(web::JsonConfig::default().error_handler(signup_body_error))
                            .route(web::post().to(handle_signup)),
                    )
                    .route("/send-updates", web::post().to(send_updates))
                    .service(
                        web::resource("/unsubscribe")
                            .app_data(
                                web::JsonConfig::default().error_handler(unsubscribe_body_error),
                            )
                            .route(web::post().to(handle_unsubscribe)),
                    ),
            )
            .default_service(web::route().to(not_found))
            .app_data(directory.clone())
            .app_data(event_source.clone())
            .app_data(email_client.clone())
            .app_data(broadcaster.clone())
            .app_data(environment.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(http::header::CONTENT_TYPE)
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

fn invalid_input<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
