use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::created;
use crate::entities::brand;
use crate::services::brands::BrandInput;
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/brands",
    responses((status = 200, description = "Brands ordered by name", body = ApiResponse<Vec<brand::Model>>)),
    tag = "brands"
)]
pub async fn list_brands(State(state): State<AppState>) -> ApiResult<Vec<brand::Model>> {
    Ok(Json(ApiResponse::success(state.services.brands.list().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand fetched", body = ApiResponse<brand::Model>),
        (status = 404, description = "Brand not found", body = crate::errors::ErrorResponse)
    ),
    tag = "brands"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<brand::Model> {
    Ok(Json(ApiResponse::success(state.services.brands.get(id).await?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/brands",
    request_body = BrandInput,
    responses(
        (status = 201, description = "Brand created", body = ApiResponse<brand::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn create_brand(
    State(state): State<AppState>,
    Json(input): Json<BrandInput>,
) -> Result<(StatusCode, Json<ApiResponse<brand::Model>>), ServiceError> {
    Ok(created(state.services.brands.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    request_body = BrandInput,
    responses(
        (status = 200, description = "Brand updated", body = ApiResponse<brand::Model>),
        (status = 404, description = "Brand not found", body = crate::errors::ErrorResponse)
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BrandInput>,
) -> ApiResult<brand::Model> {
    Ok(Json(ApiResponse::success(
        state.services.brands.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses(
        (status = 204, description = "Brand deleted"),
        (status = 404, description = "Brand not found", body = crate::errors::ErrorResponse)
    ),
    tag = "brands",
    security(("bearer_auth" = []))
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.brands.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
