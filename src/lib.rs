//! Caroption catalog backend
//!
//! Catalog tree, products and parameters for the shop, plus the generator
//! that derives one product per (generator entity, base product) pair.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod migrator;
pub mod notifications;
pub mod openapi;
pub mod services;

use axum::{
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{AuthRouterExt, AuthService};
use crate::notifications::Mailer;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(auth::AuthConfig::from(&config)));
        let services = handlers::AppServices::new(db.clone(), auth.clone(), mailer, &config);
        Self {
            db,
            config,
            services,
            auth,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::logging::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Routes mounted under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    use handlers::{
        articles, auth as auth_handlers, brands, catalog_entities, categories, generator, images,
        parameters, products,
    };

    let generator_admin = Router::new()
        .route("/generate_products", get(generator::generate_products))
        .route(
            "/delete_generated_products",
            get(generator::delete_generated_products),
        )
        .route(
            "/generated_products",
            delete(generator::delete_generated_products),
        )
        .with_admin();

    // Reads are public, writes need an admin token
    let catalog = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/entities",
            get(catalog_entities::list_entities).post(catalog_entities::create_entity),
        )
        .route(
            "/entities/:id",
            get(catalog_entities::get_entity)
                .patch(catalog_entities::update_entity)
                .delete(catalog_entities::delete_entity),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/brands", get(brands::list_brands).post(brands::create_brand))
        .route(
            "/brands/:id",
            get(brands::get_brand)
                .patch(brands::update_brand)
                .delete(brands::delete_brand),
        )
        .route("/images", get(images::list_images).post(images::create_image))
        .route(
            "/images/:id",
            get(images::get_image)
                .patch(images::update_image)
                .delete(images::delete_image),
        )
        .route(
            "/parameter_groups",
            get(parameters::list_parameter_groups).post(parameters::create_parameter_group),
        )
        .route(
            "/parameter_groups/:id",
            get(parameters::get_parameter_group)
                .patch(parameters::update_parameter_group)
                .delete(parameters::delete_parameter_group),
        )
        .route(
            "/parameters",
            get(parameters::list_parameters).post(parameters::create_parameter),
        )
        .route(
            "/parameters/:id",
            get(parameters::get_parameter)
                .patch(parameters::update_parameter)
                .delete(parameters::delete_parameter),
        )
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/:id",
            get(articles::get_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
        .with_admin_or_read_only();

    let storefront = Router::new()
        .route("/products/recent", get(products::recent_products))
        .route("/products/search", get(products::search_products))
        .route("/product_by_slug/search", get(products::product_by_slug))
        .route(
            "/products_in_category/:id",
            get(products::products_in_category),
        )
        .route("/products_in_entity/:id", get(products::products_in_entity))
        .route("/parent_entities", get(catalog_entities::parent_entities))
        .route("/parent_categories", get(categories::parent_categories))
        .route("/entity_by_slug/search", get(catalog_entities::entity_by_slug))
        .route("/article_by_slug/search", get(articles::article_by_slug))
        .route(
            "/parameters_by_category/:id",
            get(parameters::parameters_by_category),
        )
        .route(
            "/articles_in_category/:id",
            get(articles::articles_in_category),
        );

    let accounts = Router::new()
        .route("/auth/signup", post(auth_handlers::signup))
        .route("/auth/signin", post(auth_handlers::signin))
        .route(
            "/auth/reset_password/:email",
            get(auth_handlers::request_password_reset),
        )
        .route(
            "/auth/reset_password_callback/:token",
            post(auth_handlers::reset_password_callback),
        )
        .merge(
            Router::new()
                .route("/auth/me", get(auth_handlers::me))
                .with_auth(),
        );

    Router::new()
        .merge(generator_admin)
        .merge(catalog)
        .merge(storefront)
        .merge(accounts)
}

/// Full application router without the outer HTTP layers (tracing, CORS,
/// timeouts) that `main` adds.
pub fn app_router(state: AppState) -> Router {
    let auth = state.auth.clone();
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .merge(handlers::health::health_routes())
        .merge(openapi::swagger_ui())
        .layer(axum::middleware::from_fn_with_state(
            auth,
            auth::inject_auth_service,
        ))
        .with_state(state)
}
