use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::{created, SearchQuery};
use crate::entities::article;
use crate::services::articles::{ArticleInput, ArticleView};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/articles",
    responses((status = 200, description = "Articles, newest first", body = ApiResponse<Vec<ArticleView>>)),
    tag = "articles"
)]
pub async fn list_articles(State(state): State<AppState>) -> ApiResult<Vec<ArticleView>> {
    Ok(Json(ApiResponse::success(state.services.articles.list().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article fetched", body = ApiResponse<ArticleView>),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "articles"
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ArticleView> {
    Ok(Json(ApiResponse::success(state.services.articles.get(id).await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/article_by_slug/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Article fetched", body = ApiResponse<ArticleView>),
        (status = 404, description = "No article with this slug", body = crate::errors::ErrorResponse)
    ),
    tag = "articles"
)]
pub async fn article_by_slug(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<ArticleView> {
    Ok(Json(ApiResponse::success(
        state.services.articles.get_by_slug(&query.q).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/articles_in_category/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses((status = 200, description = "Articles of the category", body = ApiResponse<Vec<ArticleView>>)),
    tag = "articles"
)]
pub async fn articles_in_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ArticleView>> {
    Ok(Json(ApiResponse::success(
        state.services.articles.in_category(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = ArticleInput,
    responses(
        (status = 201, description = "Article created", body = ApiResponse<article::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "articles",
    security(("bearer_auth" = []))
)]
pub async fn create_article(
    State(state): State<AppState>,
    Json(input): Json<ArticleInput>,
) -> Result<(StatusCode, Json<ApiResponse<article::Model>>), ServiceError> {
    Ok(created(state.services.articles.create(input).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = ArticleInput,
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<article::Model>),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "articles",
    security(("bearer_auth" = []))
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ArticleInput>,
) -> ApiResult<article::Model> {
    Ok(Json(ApiResponse::success(
        state.services.articles.edit(id, input).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "articles",
    security(("bearer_auth" = []))
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.articles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
