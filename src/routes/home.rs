use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::startup::EnvironmentLabel;

#[tracing::instrument(name = "Home handler", skip(environment))]
pub async fn home(environment: web::Data<EnvironmentLabel>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Activity digest newsletter API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": environment.0,
    }))
}
