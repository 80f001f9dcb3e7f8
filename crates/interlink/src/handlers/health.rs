use axum::Json;
use interlink_protocol::HealthResponse;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
