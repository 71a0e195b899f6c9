// src/handlers/health.rs

use axum::Json;

use crate::models::shared::HealthResponse;

// GET /api/v1/
#[utoipa::path(
    get,
    path = "/api/v1/",
    tag = "Health",
    responses(
        (status = 200, description = "API no ar", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string(), message: "API is running".to_string() })
}
