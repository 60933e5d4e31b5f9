use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Caroption Catalog API",
        version = "0.3.0",
        description = r#"
# Caroption Catalog API

Catalog backend for the car accessories shop.

- **Entities**: car makes and models that act as product generators
- **Categories, brands, parameters**: catalog structure and product attributes
- **Products**: hand-made and generated products with galleries and parameter values
- **Generator**: derives one product for every (generator entity, base product) pair

## Authentication

Reads are public. Writes and the generator endpoints need an admin token:

```
Authorization: Bearer <jwt>
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "generator", description = "Derived product generation"),
        (name = "products", description = "Products and storefront queries"),
        (name = "entities", description = "Generator entities"),
        (name = "categories", description = "Category tree"),
        (name = "brands", description = "Brands"),
        (name = "images", description = "Image metadata"),
        (name = "parameters", description = "Parameter groups and definitions"),
        (name = "articles", description = "Articles"),
        (name = "auth", description = "Accounts and tokens")
    ),
    paths(
        // Generator
        crate::handlers::generator::generate_products,
        crate::handlers::generator::delete_generated_products,

        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::recent_products,
        crate::handlers::products::get_product,
        crate::handlers::products::product_by_slug,
        crate::handlers::products::search_products,
        crate::handlers::products::products_in_category,
        crate::handlers::products::products_in_entity,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Entities
        crate::handlers::catalog_entities::parent_entities,
        crate::handlers::catalog_entities::list_entities,
        crate::handlers::catalog_entities::get_entity,
        crate::handlers::catalog_entities::entity_by_slug,
        crate::handlers::catalog_entities::create_entity,
        crate::handlers::catalog_entities::update_entity,
        crate::handlers::catalog_entities::delete_entity,

        // Categories
        crate::handlers::categories::parent_categories,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,

        // Brands and images
        crate::handlers::brands::list_brands,
        crate::handlers::brands::get_brand,
        crate::handlers::brands::create_brand,
        crate::handlers::brands::update_brand,
        crate::handlers::brands::delete_brand,
        crate::handlers::images::list_images,
        crate::handlers::images::get_image,
        crate::handlers::images::create_image,
        crate::handlers::images::update_image,
        crate::handlers::images::delete_image,

        // Parameters
        crate::handlers::parameters::list_parameter_groups,
        crate::handlers::parameters::get_parameter_group,
        crate::handlers::parameters::create_parameter_group,
        crate::handlers::parameters::update_parameter_group,
        crate::handlers::parameters::delete_parameter_group,
        crate::handlers::parameters::list_parameters,
        crate::handlers::parameters::parameters_by_category,
        crate::handlers::parameters::get_parameter,
        crate::handlers::parameters::create_parameter,
        crate::handlers::parameters::update_parameter,
        crate::handlers::parameters::delete_parameter,

        // Articles
        crate::handlers::articles::list_articles,
        crate::handlers::articles::get_article,
        crate::handlers::articles::article_by_slug,
        crate::handlers::articles::articles_in_category,
        crate::handlers::articles::create_article,
        crate::handlers::articles::update_article,
        crate::handlers::articles::delete_article,

        // Auth
        crate::handlers::auth::signup,
        crate::handlers::auth::signin,
        crate::handlers::auth::me,
        crate::handlers::auth::request_password_reset,
        crate::handlers::auth::reset_password_callback,
    ),
    components(
        schemas(
            crate::services::generator::GenerationReport,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDocV1;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_generator_and_bearer_scheme() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Caroption Catalog API"));
        assert!(json.contains("/api/v1/generate_products"));
        assert!(json.contains("bearer_auth"));
    }
}
