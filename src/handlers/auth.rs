use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::common::created;
use crate::auth::{AuthUser, TokenResponse};
use crate::services::users::{Credentials, NewPassword, UserProfile};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid email or password", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ServiceError> {
    Ok(created(state.services.users.signup(credentials).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    request_body = Credentials,
    responses(
        (status = 200, description = "Access token issued", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signin(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<TokenResponse> {
    let token = state.services.users.signin(credentials).await?;
    Ok(Json(ApiResponse::success(token)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserProfile>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<UserProfile> {
    Ok(Json(ApiResponse::success(
        state.services.users.me(user.user_id).await?,
    )))
}

/// Always answers with the same message whether or not the email is known.
#[utoipa::path(
    get,
    path = "/api/v1/auth/reset_password/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses((status = 200, description = "Reset link sent if the account exists", body = ApiResponse<MessageResponse>)),
    tag = "auth"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<MessageResponse> {
    state.services.users.request_password_reset(&email).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "If the account exists, a reset link has been sent".to_string(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/reset_password_callback/{token}",
    params(("token" = String, Path, description = "Reset token from the mailed link")),
    request_body = NewPassword,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Unknown or expired token", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn reset_password_callback(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(new_password): Json<NewPassword>,
) -> ApiResult<MessageResponse> {
    state
        .services
        .users
        .reset_password(&token, new_password)
        .await?;
    info!("Password reset completed");
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated".to_string(),
    })))
}
