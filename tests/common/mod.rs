#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use caroption_catalog::{
    app_router,
    config::AppConfig,
    db,
    entities::{catalog_entity, image, parameter, product},
    notifications::MemoryMailer,
    services::{
        catalog_entities::EntityInput, images::ImageInput, parameters::ParameterInput,
        products::ProductInput, users::Credentials,
    },
    AppState,
};

pub const ADMIN_EMAIL: &str = "admin@caroption.test";
pub const USER_EMAIL: &str = "driver@caroption.test";
pub const PASSWORD: &str = "correct-horse-battery";

/// Application backed by a throwaway SQLite file, with one admin and one
/// regular account already signed in.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub mailer: MemoryMailer,
    pub admin_token: String,
    pub user_token: String,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_path = dir.path().join("catalog.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "test_secret_key_for_catalog_tests_only_32chars".to_string(),
            3600,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.base_url = "http://shop.test".to_string();
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let mailer = MemoryMailer::new();
        let state = AppState::new(Arc::new(pool), cfg, Arc::new(mailer.clone()));

        let users = state.services.users.clone();
        for (email, is_admin) in [(ADMIN_EMAIL, true), (USER_EMAIL, false)] {
            users
                .create_account(credentials(email, PASSWORD), is_admin)
                .await
                .expect("seed account");
        }
        let admin_token = users
            .signin(credentials(ADMIN_EMAIL, PASSWORD))
            .await
            .expect("admin signin")
            .access_token;
        let user_token = users
            .signin(credentials(USER_EMAIL, PASSWORD))
            .await
            .expect("user signin")
            .access_token;

        Self {
            router: app_router(state.clone()),
            state,
            mailer,
            admin_token,
            user_token,
            _dir: dir,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn as_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(&self.admin_token)).await
    }

    pub async fn exec_sql(&self, sql: &str) {
        let backend = self.db().get_database_backend();
        self.db()
            .execute(Statement::from_string(backend, sql.to_string()))
            .await
            .expect("execute raw sql");
    }

    pub async fn seed_entity(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
        price: Option<&str>,
        keywords: &[&str],
    ) -> catalog_entity::Model {
        let input: EntityInput = from_json(json!({
            "name": name,
            "parent_id": parent_id,
            "description": format!("{} description", name),
            "entity_slug": name.to_lowercase().replace(' ', "-"),
            "price": price,
            "keywords": keywords,
        }));
        self.state
            .services
            .entities
            .create(input)
            .await
            .expect("seed entity")
    }

    pub async fn seed_base_product(
        &self,
        name: &str,
        price: Option<&str>,
        keywords: &[&str],
    ) -> product::Model {
        self.seed_product(json!({
            "name": name,
            "slug": name.to_lowercase().replace(' ', "-"),
            "description": format!("{} description", name),
            "price": price,
            "keywords": keywords,
            "generatable": true,
        }))
        .await
    }

    pub async fn seed_product(&self, body: Value) -> product::Model {
        let input: ProductInput = from_json(body);
        self.state
            .services
            .products
            .create(input)
            .await
            .expect("seed product")
    }

    pub async fn seed_image(&self, name: &str, url: &str) -> image::Model {
        let input = ImageInput {
            name: name.to_string(),
            image_url: url.to_string(),
            product_id: None,
            category_id: None,
        };
        self.state
            .services
            .images
            .create(input)
            .await
            .expect("seed image")
    }

    pub async fn seed_text_parameter(&self, name: &str) -> parameter::Model {
        let input: ParameterInput = from_json(json!({
            "name": name,
            "type": "text",
            "priority": "1",
        }));
        self.state
            .services
            .parameters
            .create(input)
            .await
            .expect("seed parameter")
    }
}

pub fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn from_json<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("valid test input")
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body is json")
}
