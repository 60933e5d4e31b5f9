use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::{created, SearchQuery};
use crate::entities::product;
use crate::services::products::{ProductDetail, ProductInput};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "All products with galleries and parameter values", body = ApiResponse<Vec<ProductDetail>>)
    ),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<ProductDetail>> {
    let products = state.services.products.list().await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/recent",
    responses(
        (status = 200, description = "Shown products added in the last 30 days", body = ApiResponse<Vec<ProductDetail>>)
    ),
    tag = "products"
)]
pub async fn recent_products(State(state): State<AppState>) -> ApiResult<Vec<ProductDetail>> {
    let products = state.services.products.recently_added().await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product fetched", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductDetail> {
    let product = state.services.products.get(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

#[utoipa::path(
    get,
    path = "/api/v1/product_by_slug/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Product fetched", body = ApiResponse<ProductDetail>),
        (status = 404, description = "No product with this slug", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn product_by_slug(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<ProductDetail> {
    let product = state.services.products.get_by_slug(&query.q).await?;
    Ok(Json(ApiResponse::success(product)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Shown products whose name matches", body = ApiResponse<Vec<ProductDetail>>)
    ),
    tag = "products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<ProductDetail>> {
    let products = state.services.products.search(&query.q).await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products_in_category/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Products of the category and its children", body = ApiResponse<Vec<ProductDetail>>)
    ),
    tag = "products"
)]
pub async fn products_in_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ProductDetail>> {
    let products = state.services.products.in_category(id).await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products_in_entity/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    responses(
        (status = 200, description = "Generated products of the entity and its children", body = ApiResponse<Vec<ProductDetail>>)
    ),
    tag = "products"
)]
pub async fn products_in_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ProductDetail>> {
    let products = state.services.products.in_entity(id).await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<product::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ApiResponse<product::Model>>), ServiceError> {
    let product = state.services.products.create(input).await?;
    Ok(created(product))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> ApiResult<product::Model> {
    let product = state.services.products.edit(id, input).await?;
    Ok(Json(ApiResponse::success(product)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
