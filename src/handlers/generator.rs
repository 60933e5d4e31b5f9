use axum::{extract::State, Json};
use tracing::info;

use crate::{errors::ServiceError, AppState};

/// Body of both generator endpoints: an empty JSON array
type EmptyList = Json<Vec<String>>;

#[utoipa::path(
    get,
    path = "/api/v1/generate_products",
    responses(
        (status = 200, description = "Derived products regenerated; body is always []", body = Vec<String>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::errors::ErrorResponse),
        (status = 409, description = "Derived name collides with an existing product", body = crate::errors::ErrorResponse)
    ),
    tag = "generator",
    security(("bearer_auth" = []))
)]
pub async fn generate_products(State(state): State<AppState>) -> Result<EmptyList, ServiceError> {
    let report = state.services.generator.generate().await?;
    info!(derived = report.product_ids.len(), "generate_products finished");
    Ok(Json(Vec::new()))
}

#[utoipa::path(
    get,
    path = "/api/v1/delete_generated_products",
    responses(
        (status = 200, description = "Generated products removed; body is always []", body = Vec<String>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::errors::ErrorResponse)
    ),
    tag = "generator",
    security(("bearer_auth" = []))
)]
pub async fn delete_generated_products(
    State(state): State<AppState>,
) -> Result<EmptyList, ServiceError> {
    let removed = state.services.generator.purge().await?;
    info!(removed, "delete_generated_products finished");
    Ok(Json(Vec::new()))
}
