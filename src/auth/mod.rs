/*!
 * # Authentication and Authorization
 *
 * Bearer JWT authentication (HS256) for shop accounts, plus route guards:
 *
 * - `with_auth`: any valid token
 * - `with_admin`: a valid token whose `is_admin` claim is set
 * - `with_admin_or_read_only`: safe methods open to everyone, writes need an admin
 *
 * The guards find the [`AuthService`] in the request extensions, so the
 * router must be wrapped in [`inject_auth_service`].
 */

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::entities::user;
use crate::errors::ServiceError;

pub mod password;

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub is_admin: bool,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub token_id: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?,
            email: claims.email,
            is_admin: claims.is_admin,
            token_id: claims.jti,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration: Duration) -> Self {
        Self {
            jwt_secret,
            token_expiration,
        }
    }
}

impl From<&AppConfig> for AuthConfig {
    fn from(config: &AppConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            Duration::from_secs(config.jwt_expiration as u64),
        )
    }
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Issues and validates access tokens
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn generate_token(&self, user: &user::Model) -> Result<TokenResponse, AuthError> {
        let now = Utc::now();
        let expires_in = ChronoDuration::from_std(self.config.token_expiration)
            .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in.num_seconds(),
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    /// Resolves the bearer token in `headers` to an [`AuthUser`].
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::InvalidToken)?;

        self.validate_token(token)?.try_into()
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, String) = match &self {
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "No authentication token provided".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_PERMISSIONS",
                "Admin access required".to_string(),
            ),
            Self::TokenCreation(_) | Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => ServiceError::Forbidden(err.to_string()),
            AuthError::TokenCreation(msg) => ServiceError::InternalError(msg),
            AuthError::InternalError(msg) => ServiceError::InternalError(msg),
            other => ServiceError::Unauthorized(other.to_string()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        let auth_service = parts
            .extensions
            .get::<Arc<AuthService>>()
            .cloned()
            .ok_or_else(|| AuthError::InternalError("auth service not installed".to_string()))?;
        auth_service.authenticate(&parts.headers)
    }
}

/// Installs the [`AuthService`] into request extensions for the guards and the [`AuthUser`] extractor
pub async fn inject_auth_service(
    axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(auth);
    next.run(request).await
}

fn auth_service_from(request: &Request) -> Result<Arc<AuthService>, AuthError> {
    request
        .extensions()
        .get::<Arc<AuthService>>()
        .cloned()
        .ok_or_else(|| AuthError::InternalError("auth service not installed".to_string()))
}

/// Requires any valid bearer token
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AuthError> {
    let user = auth_service_from(&request)?.authenticate(request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Requires a valid bearer token belonging to an admin
pub async fn admin_middleware(mut request: Request, next: Next) -> Result<Response, AuthError> {
    let user = auth_service_from(&request)?.authenticate(request.headers())?;
    if !user.is_admin {
        debug!(user_id = %user.user_id, "Rejected non-admin request");
        return Err(AuthError::InsufficientPermissions);
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Lets safe methods through; everything else goes through [`admin_middleware`]
pub async fn admin_or_read_only_middleware(
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if is_read_only(request.method()) {
        return Ok(next.run(request).await);
    }
    admin_middleware(request, next).await
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_admin(self) -> Self;
    fn with_admin_or_read_only(self) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.route_layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_admin(self) -> Self {
        self.route_layer(axum::middleware::from_fn(admin_middleware))
    }

    fn with_admin_or_read_only(self) -> Self {
        self.route_layer(axum::middleware::from_fn(admin_or_read_only_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    const SECRET: &str = "a_test_secret_that_is_long_enough_for_hs256";

    fn service(expiration: Duration) -> AuthService {
        AuthService::new(AuthConfig::new(SECRET.to_string(), expiration))
    }

    fn account(is_admin: bool) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            email: "driver@example.com".to_string(),
            password: String::new(),
            is_admin,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let auth = service(Duration::from_secs(3600));
        let user = account(true);
        let token = auth.generate_token(&user).unwrap();

        let authed = auth.authenticate(&bearer(&token.access_token)).unwrap();
        assert_eq!(authed.user_id, user.id);
        assert_eq!(authed.email, user.email);
        assert!(authed.is_admin);
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let issuer = AuthService::new(AuthConfig::new(
            "another_secret_that_is_also_long_enough".to_string(),
            Duration::from_secs(60),
        ));
        let token = issuer.generate_token(&account(false)).unwrap();

        assert_matches!(
            service(Duration::from_secs(60)).authenticate(&bearer(&token.access_token)),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn missing_header_is_reported() {
        assert_matches!(
            service(Duration::from_secs(60)).authenticate(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn non_bearer_scheme_is_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_matches!(
            service(Duration::from_secs(60)).authenticate(&headers),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn safe_methods_are_read_only() {
        assert!(is_read_only(&Method::GET));
        assert!(!is_read_only(&Method::POST));
        assert!(!is_read_only(&Method::DELETE));
    }

    #[test]
    fn auth_failures_map_to_service_errors() {
        assert_matches!(
            ServiceError::from(AuthError::TokenCreation("bad key".into())),
            ServiceError::InternalError(msg) if msg == "bad key"
        );
        assert_matches!(
            ServiceError::from(AuthError::TokenExpired),
            ServiceError::Unauthorized(_)
        );
        assert_matches!(
            ServiceError::from(AuthError::InsufficientPermissions),
            ServiceError::Forbidden(_)
        );
        assert_eq!(
            ServiceError::from(AuthError::InvalidToken).status_code(),
            axum::http::StatusCode::UNAUTHORIZED
        );
    }
}
