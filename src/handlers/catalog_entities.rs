use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::{created, SearchQuery};
use crate::entities::catalog_entity;
use crate::services::catalog_entities::{EntityInput, EntityTree, EntityView};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/parent_entities",
    responses((status = 200, description = "Root entities by priority with their children", body = ApiResponse<Vec<EntityTree>>)),
    tag = "entities"
)]
pub async fn parent_entities(State(state): State<AppState>) -> ApiResult<Vec<EntityTree>> {
    Ok(Json(ApiResponse::success(
        state.services.entities.list_parents().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/entities",
    responses((status = 200, description = "All entities", body = ApiResponse<Vec<EntityView>>)),
    tag = "entities"
)]
pub async fn list_entities(State(state): State<AppState>) -> ApiResult<Vec<EntityView>> {
    Ok(Json(ApiResponse::success(state.services.entities.list().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/entities/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    responses(
        (status = 200, description = "Entity fetched", body = ApiResponse<catalog_entity::Model>),
        (status = 404, description = "Entity not found", body = crate::errors::ErrorResponse)
    ),
    tag = "entities"
)]
pub async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<catalog_entity::Model> {
    Ok(Json(ApiResponse::success(state.services.entities.get(id).await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/entity_by_slug/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Entity fetched", body = ApiResponse<EntityView>),
        (status = 404, description = "No entity with this slug", body = crate::errors::ErrorResponse)
    ),
    tag = "entities"
)]
pub async fn entity_by_slug(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<EntityView> {
    Ok(Json(ApiResponse::success(
        state.services.entities.get_by_slug(&query.q).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/entities",
    request_body = EntityInput,
    responses(
        (status = 201, description = "Entity created", body = ApiResponse<catalog_entity::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "entities",
    security(("bearer_auth" = []))
)]
pub async fn create_entity(
    State(state): State<AppState>,
    Json(input): Json<EntityInput>,
) -> Result<(StatusCode, Json<ApiResponse<catalog_entity::Model>>), ServiceError> {
    Ok(created(state.services.entities.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/entities/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    request_body = EntityInput,
    responses(
        (status = 200, description = "Entity updated", body = ApiResponse<catalog_entity::Model>),
        (status = 404, description = "Entity not found", body = crate::errors::ErrorResponse)
    ),
    tag = "entities",
    security(("bearer_auth" = []))
)]
pub async fn update_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<EntityInput>,
) -> ApiResult<catalog_entity::Model> {
    Ok(Json(ApiResponse::success(
        state.services.entities.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/entities/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    responses(
        (status = 204, description = "Entity deleted"),
        (status = 404, description = "Entity not found", body = crate::errors::ErrorResponse)
    ),
    tag = "entities",
    security(("bearer_auth" = []))
)]
pub async fn delete_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.entities.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
