use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::created;
use crate::entities::image;
use crate::services::images::ImageInput;
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/images",
    responses((status = 200, description = "Image metadata", body = ApiResponse<Vec<image::Model>>)),
    tag = "images"
)]
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Vec<image::Model>> {
    Ok(Json(ApiResponse::success(state.services.images.list().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/{id}",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image fetched", body = ApiResponse<image::Model>),
        (status = 404, description = "Image not found", body = crate::errors::ErrorResponse)
    ),
    tag = "images"
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<image::Model> {
    Ok(Json(ApiResponse::success(state.services.images.get(id).await?)))
}

/// Registers an already uploaded file by URL
#[utoipa::path(
    post,
    path = "/api/v1/images",
    request_body = ImageInput,
    responses(
        (status = 201, description = "Image registered", body = ApiResponse<image::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "images",
    security(("bearer_auth" = []))
)]
pub async fn create_image(
    State(state): State<AppState>,
    Json(input): Json<ImageInput>,
) -> Result<(StatusCode, Json<ApiResponse<image::Model>>), ServiceError> {
    Ok(created(state.services.images.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/images/{id}",
    params(("id" = Uuid, Path, description = "Image ID")),
    request_body = ImageInput,
    responses(
        (status = 200, description = "Image updated", body = ApiResponse<image::Model>),
        (status = 404, description = "Image not found", body = crate::errors::ErrorResponse)
    ),
    tag = "images",
    security(("bearer_auth" = []))
)]
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ImageInput>,
) -> ApiResult<image::Model> {
    Ok(Json(ApiResponse::success(
        state.services.images.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/images/{id}",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found", body = crate::errors::ErrorResponse)
    ),
    tag = "images",
    security(("bearer_auth" = []))
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.images.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
