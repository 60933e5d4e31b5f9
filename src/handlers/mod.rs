pub mod articles;
pub mod auth;
pub mod brands;
pub mod catalog_entities;
pub mod categories;
pub mod common;
pub mod generator;
pub mod health;
pub mod images;
pub mod parameters;
pub mod products;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::notifications::Mailer;
use crate::services::{
    articles::ArticleService, brands::BrandService, catalog_entities::CatalogEntityService,
    categories::CategoryService, generator::GeneratorService, images::ImageService,
    parameter_groups::ParameterGroupService, parameters::ParameterService,
    products::ProductService, users::UserService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub generator: Arc<GeneratorService>,
    pub entities: Arc<CatalogEntityService>,
    pub categories: Arc<CategoryService>,
    pub brands: Arc<BrandService>,
    pub images: Arc<ImageService>,
    pub parameter_groups: Arc<ParameterGroupService>,
    pub parameters: Arc<ParameterService>,
    pub products: Arc<ProductService>,
    pub articles: Arc<ArticleService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        auth_service: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
        config: &AppConfig,
    ) -> Self {
        let generator = GeneratorService::new(db_pool.clone()).with_statement_timeout(
            config.db_statement_timeout_secs.map(Duration::from_secs),
        );

        Self {
            generator: Arc::new(generator),
            entities: Arc::new(CatalogEntityService::new(db_pool.clone())),
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            brands: Arc::new(BrandService::new(db_pool.clone())),
            images: Arc::new(ImageService::new(db_pool.clone())),
            parameter_groups: Arc::new(ParameterGroupService::new(db_pool.clone())),
            parameters: Arc::new(ParameterService::new(db_pool.clone())),
            products: Arc::new(ProductService::new(db_pool.clone())),
            articles: Arc::new(ArticleService::new(db_pool.clone())),
            users: Arc::new(UserService::new(
                db_pool,
                auth_service,
                mailer,
                config.base_url.clone(),
                config.password_reset_ttl_secs,
            )),
        }
    }
}
