use actix_web::HttpResponse;

pub const AVAILABLE_ROUTES: [&str; 8] = [
    "GET /",
    "GET /health_check",
    "GET /api/test-db",
    "GET /api/test-github",
    "GET /api/stats",
    "POST /api/signup",
    "POST /api/send-updates",
    "POST /api/unsubscribe",
];

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Route not found",
        "availableRoutes": AVAILABLE_ROUTES,
    }))
}
