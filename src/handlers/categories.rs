use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::created;
use crate::entities::category;
use crate::services::categories::{CategoryInput, CategoryTree, CategoryView};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/parent_categories",
    responses((status = 200, description = "Root categories by priority with their children", body = ApiResponse<Vec<CategoryTree>>)),
    tag = "categories"
)]
pub async fn parent_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryTree>> {
    Ok(Json(ApiResponse::success(
        state.services.categories.list_parents().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<CategoryView>>)),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryView>> {
    Ok(Json(ApiResponse::success(
        state.services.categories.list().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category fetched", body = ApiResponse<category::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<category::Model> {
    Ok(Json(ApiResponse::success(
        state.services.categories.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<category::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<ApiResponse<category::Model>>), ServiceError> {
    Ok(created(state.services.categories.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<category::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<category::Model> {
    Ok(Json(ApiResponse::success(
        state.services.categories.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
