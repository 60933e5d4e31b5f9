//! Parameter groups and parameter definitions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::created;
use crate::entities::{parameter, parameter_group};
use crate::services::parameter_groups::{ParameterGroupInput, ParameterGroupView};
use crate::services::parameters::ParameterInput;
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/parameter_groups",
    responses((status = 200, description = "Parameter groups with category names", body = ApiResponse<Vec<ParameterGroupView>>)),
    tag = "parameters"
)]
pub async fn list_parameter_groups(
    State(state): State<AppState>,
) -> ApiResult<Vec<ParameterGroupView>> {
    Ok(Json(ApiResponse::success(
        state.services.parameter_groups.list().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parameter_groups/{id}",
    params(("id" = Uuid, Path, description = "Parameter group ID")),
    responses(
        (status = 200, description = "Parameter group fetched", body = ApiResponse<parameter_group::Model>),
        (status = 404, description = "Parameter group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters"
)]
pub async fn get_parameter_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<parameter_group::Model> {
    Ok(Json(ApiResponse::success(
        state.services.parameter_groups.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/parameter_groups",
    request_body = ParameterGroupInput,
    responses(
        (status = 201, description = "Parameter group created", body = ApiResponse<parameter_group::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters",
    security(("bearer_auth" = []))
)]
pub async fn create_parameter_group(
    State(state): State<AppState>,
    Json(input): Json<ParameterGroupInput>,
) -> Result<(StatusCode, Json<ApiResponse<parameter_group::Model>>), ServiceError> {
    Ok(created(state.services.parameter_groups.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/parameter_groups/{id}",
    params(("id" = Uuid, Path, description = "Parameter group ID")),
    request_body = ParameterGroupInput,
    responses(
        (status = 200, description = "Parameter group updated", body = ApiResponse<parameter_group::Model>),
        (status = 404, description = "Parameter group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters",
    security(("bearer_auth" = []))
)]
pub async fn update_parameter_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ParameterGroupInput>,
) -> ApiResult<parameter_group::Model> {
    Ok(Json(ApiResponse::success(
        state.services.parameter_groups.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parameter_groups/{id}",
    params(("id" = Uuid, Path, description = "Parameter group ID")),
    responses(
        (status = 204, description = "Parameter group deleted"),
        (status = 404, description = "Parameter group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters",
    security(("bearer_auth" = []))
)]
pub async fn delete_parameter_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.parameter_groups.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/parameters",
    responses((status = 200, description = "Parameters by priority", body = ApiResponse<Vec<parameter::Model>>)),
    tag = "parameters"
)]
pub async fn list_parameters(State(state): State<AppState>) -> ApiResult<Vec<parameter::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.parameters.list().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parameters_by_category/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Parameters of the category's root", body = ApiResponse<Vec<parameter::Model>>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters"
)]
pub async fn parameters_by_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<parameter::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.parameters.list_by_category(id).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parameters/{id}",
    params(("id" = Uuid, Path, description = "Parameter ID")),
    responses(
        (status = 200, description = "Parameter fetched", body = ApiResponse<parameter::Model>),
        (status = 404, description = "Parameter not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters"
)]
pub async fn get_parameter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<parameter::Model> {
    Ok(Json(ApiResponse::success(
        state.services.parameters.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/parameters",
    request_body = ParameterInput,
    responses(
        (status = 201, description = "Parameter created", body = ApiResponse<parameter::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters",
    security(("bearer_auth" = []))
)]
pub async fn create_parameter(
    State(state): State<AppState>,
    Json(input): Json<ParameterInput>,
) -> Result<(StatusCode, Json<ApiResponse<parameter::Model>>), ServiceError> {
    Ok(created(state.services.parameters.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/parameters/{id}",
    params(("id" = Uuid, Path, description = "Parameter ID")),
    request_body = ParameterInput,
    responses(
        (status = 200, description = "Parameter updated", body = ApiResponse<parameter::Model>),
        (status = 404, description = "Parameter not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters",
    security(("bearer_auth" = []))
)]
pub async fn update_parameter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ParameterInput>,
) -> ApiResult<parameter::Model> {
    Ok(Json(ApiResponse::success(
        state.services.parameters.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parameters/{id}",
    params(("id" = Uuid, Path, description = "Parameter ID")),
    responses(
        (status = 204, description = "Parameter deleted"),
        (status = 404, description = "Parameter not found", body = crate::errors::ErrorResponse)
    ),
    tag = "parameters",
    security(("bearer_auth" = []))
)]
pub async fn delete_parameter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.parameters.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
