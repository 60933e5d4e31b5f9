use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use std::time::Instant;

use crate::AppState;

/// Tracks application start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

pub fn init_start_time() {
    let _ = START_TIME.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// Liveness with a database ping; 503 when the database is unreachable
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let db_result = crate::db::check_connection(&state.db).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let (status, mut body) = match db_result {
        Ok(()) => (
            StatusCode::OK,
            json!({
                "status": "up",
                "database": { "status": "up", "latency_ms": latency_ms },
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "down",
                "database": { "status": "down", "error": e.response_message() },
            }),
        ),
    };

    body["version"] = json!(env!("CARGO_PKG_VERSION"));
    body["uptime_secs"] = json!(uptime_secs());
    body["timestamp"] = json!(chrono::Utc::now().to_rfc3339());
    (status, Json(body))
}

/// - GET /health - liveness with database ping
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
