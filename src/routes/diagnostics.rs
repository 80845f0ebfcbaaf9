use actix_web::{web, HttpResponse};

use crate::directory::SubscriberDirectory;
use crate::event_source::EventSource;

const SAMPLE_EVENTS: usize = 3;

/// Checks that the subscriber store answers queries.
#[tracing::instrument(name = "Store connectivity check", skip(directory))]
pub async fn test_db(directory: web::Data<dyn SubscriberDirectory>) -> HttpResponse {
    match directory.count_active().await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Database connection successful",
            "data": { "activeSubscribers": total },
        })),
        Err(err) => {
            tracing::error!("Store connectivity check failed: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Database connection failed",
                "details": err.to_string(),
            }))
        }
    }
}

/// Checks that at least one event feed answers, without the sample fallback.
#[tracing::instrument(name = "Event feed connectivity check", skip(event_source))]
pub async fn test_github(event_source: web::Data<dyn EventSource>) -> HttpResponse {
    match event_source.probe().await {
        Ok(events) => HttpResponse::Ok().json(serde_json::json!({
            "message": "GitHub API connection successful",
            "eventsCount": events.len(),
            "sampleEvents": events.iter().take(SAMPLE_EVENTS).collect::<Vec<_>>(),
        })),
        Err(err) => {
            tracing::error!("Event feed connectivity check failed: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "GitHub API connection failed",
                "details": err.to_string(),
            }))
        }
    }
}
