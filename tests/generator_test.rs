mod common;

use std::collections::HashSet;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use caroption_catalog::entities::{
    catalog_entity, image, product, product_parameter_value, StringList,
};
use caroption_catalog::errors::ServiceError;
use caroption_catalog::services::catalog_entities::EntityInput;
use common::{from_json, read_json, TestApp};

async fn product_named(app: &TestApp, name: &str) -> product::Model {
    product::Entity::find()
        .filter(product::Column::Name.eq(name))
        .one(app.db())
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("product '{}' missing", name))
}

async fn generated_count(app: &TestApp) -> u64 {
    product::Entity::find()
        .filter(product::Column::Generated.eq(true))
        .count(app.db())
        .await
        .unwrap()
}

async fn image_count(app: &TestApp, product_id: Uuid) -> u64 {
    image::Entity::find()
        .filter(image::Column::ProductId.eq(product_id))
        .count(app.db())
        .await
        .unwrap()
}

async fn value_count(app: &TestApp, product_id: Uuid) -> u64 {
    product_parameter_value::Entity::find()
        .filter(product_parameter_value::Column::ProductId.eq(product_id))
        .count(app.db())
        .await
        .unwrap()
}

#[tokio::test]
async fn generates_one_product_per_generator_and_base() {
    let app = TestApp::new().await;
    let toyota = app.seed_entity("Toyota", None, None, &[]).await;
    let corolla = app
        .seed_entity("Corolla", Some(toyota.id), Some("250"), &["suv", "2024"])
        .await;
    app.seed_entity("Camry", Some(toyota.id), None, &[]).await;
    app.seed_base_product("Seat Cover", Some("100"), &["red", "suv"])
        .await;
    app.seed_base_product("Floor Mat", Some("40"), &[]).await;
    // Hand-made products that are not generatable stay out of the cross product
    app.seed_product(json!({ "name": "Air Freshener", "price": "5" }))
        .await;

    let report = app.state.services.generator.generate().await.unwrap();
    assert_eq!(report.generators, 2);
    assert_eq!(report.bases, 2);
    assert_eq!(report.product_ids.len(), 4);
    assert_eq!(generated_count(&app).await, 4);

    let derived = product_named(&app, "Seat Cover Corolla").await;
    assert_eq!(derived.price.as_deref(), Some("350"));
    assert_eq!(
        derived.keywords,
        StringList::from(["red", "suv", "2024"])
    );
    assert_eq!(
        derived.description.as_deref(),
        Some("Seat Cover description Corolla description")
    );
    assert_eq!(derived.slug.as_deref(), Some("seat-cover_corolla"));
    assert_eq!(derived.entity_id, Some(corolla.id));
    assert_eq!(derived.generator_id, Some(corolla.id));
    assert!(derived.generated);
    assert!(derived.show);
    assert!(!derived.generatable);

    let camry = product_named(&app, "Floor Mat Camry").await;
    assert_eq!(camry.price.as_deref(), Some("40"));
}

#[tokio::test]
async fn hidden_and_root_entities_do_not_generate() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Kia", None, None, &[]).await;
    app.seed_entity("Rio", Some(root.id), None, &[]).await;
    let hidden: EntityInput = from_json(json!({
        "name": "Pride",
        "parent_id": root.id,
        "show": false,
    }));
    app.state.services.entities.create(hidden).await.unwrap();
    app.seed_base_product("Mirror", Some("10"), &[]).await;

    let report = app.state.services.generator.generate().await.unwrap();
    assert_eq!(report.generators, 1);
    assert_eq!(report.product_ids.len(), 1);
    product_named(&app, "Mirror Rio").await;
}

#[tokio::test]
async fn rerunning_generation_is_idempotent() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Peugeot", None, None, &[]).await;
    app.seed_entity("206", Some(root.id), Some("30"), &["hatch"])
        .await;
    let front = app.seed_image("front", "https://cdn.test/front.jpg").await;
    let back = app.seed_image("back", "https://cdn.test/back.jpg").await;
    let size = app.seed_text_parameter("Size").await;
    app.seed_product(json!({
        "name": "Sun Shade",
        "slug": "sun-shade",
        "price": "70",
        "keywords": ["summer"],
        "generatable": true,
        "image_ids": [front.id, back.id],
        "parameter_values": [{ "parameter_id": size.id, "text_value": "L" }],
    }))
    .await;

    let generator = &app.state.services.generator;
    let first = generator.generate().await.unwrap();
    let second = generator.generate().await.unwrap();

    assert_eq!(first.product_ids, second.product_ids);
    assert_eq!(generated_count(&app).await, 1);

    let derived = product_named(&app, "Sun Shade 206").await;
    assert_eq!(derived.id, first.product_ids[0]);
    assert_eq!(derived.price.as_deref(), Some("100"));
    assert_eq!(derived.keywords, StringList::from(["summer", "hatch"]));
    assert_eq!(image_count(&app, derived.id).await, 2);
    assert_eq!(value_count(&app, derived.id).await, 1);
}

#[tokio::test]
async fn regeneration_picks_up_base_changes() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Renault", None, None, &[]).await;
    app.seed_entity("Logan", Some(root.id), Some("5"), &[]).await;
    let base = app.seed_base_product("Wiper", Some("20"), &[]).await;

    let generator = &app.state.services.generator;
    let first = generator.generate().await.unwrap();

    let mut changed: product::ActiveModel = base.into();
    changed.price = Set(Some("25".to_string()));
    changed.update(app.db()).await.unwrap();
    let second = generator.generate().await.unwrap();

    assert_eq!(first.product_ids, second.product_ids);
    let derived = product_named(&app, "Wiper Logan").await;
    assert_eq!(derived.price.as_deref(), Some("30"));
}

#[tokio::test]
async fn malformed_prices_count_as_zero() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Hyundai", None, None, &[]).await;
    app.seed_entity("Accent", Some(root.id), Some("250"), &[]).await;
    app.seed_base_product("Antenna", Some("abc"), &[]).await;

    app.state.services.generator.generate().await.unwrap();

    let derived = product_named(&app, "Antenna Accent").await;
    assert_eq!(derived.price.as_deref(), Some("250"));
}

#[tokio::test]
async fn purge_removes_generated_products_only() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Nissan", None, None, &[]).await;
    app.seed_entity("Sunny", Some(root.id), None, &[]).await;
    app.seed_entity("Maxima", Some(root.id), None, &[]).await;
    let photo = app.seed_image("photo", "https://cdn.test/cover.jpg").await;
    let size = app.seed_text_parameter("Material").await;
    let base = app
        .seed_product(json!({
            "name": "Steering Cover",
            "generatable": true,
            "image_ids": [photo.id],
            "parameter_values": [{ "parameter_id": size.id, "text_value": "leather" }],
        }))
        .await;
    let other = app.seed_base_product("Gear Knob", Some("15"), &[]).await;

    let generator = &app.state.services.generator;
    generator.generate().await.unwrap();
    assert_eq!(generated_count(&app).await, 4);

    let removed = generator.purge().await.unwrap();
    assert_eq!(removed, 4);
    assert_eq!(generated_count(&app).await, 0);

    // Base products keep their own gallery and values
    assert_eq!(image_count(&app, base.id).await, 1);
    assert_eq!(value_count(&app, base.id).await, 1);
    assert!(product::Entity::find_by_id(other.id)
        .one(app.db())
        .await
        .unwrap()
        .is_some());

    let orphan_values = product_parameter_value::Entity::find()
        .count(app.db())
        .await
        .unwrap();
    assert_eq!(orphan_values, 1);

    let report = generator.generate().await.unwrap();
    assert_eq!(report.product_ids.len(), 4);
    assert_eq!(generator.purge().await.unwrap(), 4);
    assert_eq!(generator.purge().await.unwrap(), 0);
}

#[tokio::test]
async fn colliding_derived_names_abort_the_run() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Ford", None, None, &[]).await;
    app.seed_entity("X", Some(root.id), None, &[]).await;
    app.seed_entity("Pro X", Some(root.id), None, &[]).await;
    app.seed_base_product("Cover", None, &[]).await;
    app.seed_base_product("Cover Pro", None, &[]).await;

    let err = app.state.services.generator.generate().await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
    assert_eq!(generated_count(&app).await, 0);
}

#[tokio::test]
async fn derived_name_taken_by_hand_made_product_conflicts() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Mazda", None, None, &[]).await;
    app.seed_entity("CX5", Some(root.id), None, &[]).await;
    app.seed_base_product("Roof Rack", None, &[]).await;
    app.seed_product(json!({ "name": "Roof Rack CX5" })).await;

    let err = app.state.services.generator.generate().await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
    assert_eq!(generated_count(&app).await, 0);

    let response = app
        .as_admin(Method::GET, "/api/v1/generate_products", None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

async fn rename_entity(app: &TestApp, entity: catalog_entity::Model, name: &str) {
    let mut renamed: catalog_entity::ActiveModel = entity.into();
    renamed.name = Set(name.to_string());
    renamed.update(app.db()).await.unwrap();
}

#[tokio::test]
async fn renamed_generator_frees_its_old_name_for_a_new_one() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Chery", None, None, &[]).await;
    let x = app.seed_entity("X", Some(root.id), None, &[]).await;
    app.seed_base_product("Cover", Some("10"), &[]).await;

    let generator = &app.state.services.generator;
    generator.generate().await.unwrap();
    let original = product_named(&app, "Cover X").await;

    rename_entity(&app, x.clone(), "Z").await;
    let newcomer = app.seed_entity("X", Some(root.id), None, &[]).await;

    let report = generator.generate().await.unwrap();
    assert_eq!(report.product_ids.len(), 2);
    assert_eq!(generated_count(&app).await, 2);

    // The old pair keeps its row under the new name
    let renamed = product_named(&app, "Cover Z").await;
    assert_eq!(renamed.id, original.id);
    assert_eq!(renamed.generator_id, Some(x.id));

    let taken_over = product_named(&app, "Cover X").await;
    assert_ne!(taken_over.id, original.id);
    assert_eq!(taken_over.generator_id, Some(newcomer.id));
}

#[tokio::test]
async fn generators_swapping_names_regenerate_cleanly() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Saipa", None, None, &[]).await;
    let first = app.seed_entity("Pride", Some(root.id), None, &[]).await;
    let second = app.seed_entity("Tiba", Some(root.id), None, &[]).await;
    app.seed_base_product("Seat", None, &[]).await;

    let generator = &app.state.services.generator;
    generator.generate().await.unwrap();
    let pride = product_named(&app, "Seat Pride").await;
    let tiba = product_named(&app, "Seat Tiba").await;

    rename_entity(&app, first, "Tiba").await;
    rename_entity(&app, second, "Pride").await;
    generator.generate().await.unwrap();

    assert_eq!(generated_count(&app).await, 2);
    assert_eq!(product_named(&app, "Seat Tiba").await.id, pride.id);
    assert_eq!(product_named(&app, "Seat Pride").await.id, tiba.id);
}

#[tokio::test]
async fn derived_name_held_by_a_retired_pair_still_conflicts() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Geely", None, None, &[]).await;
    let emgrand = app.seed_entity("Emgrand", Some(root.id), None, &[]).await;
    app.seed_base_product("Mat", None, &[]).await;
    app.state.services.generator.generate().await.unwrap();

    // The old pair drops out of the plan but its row keeps the name
    let mut hidden: catalog_entity::ActiveModel = emgrand.into();
    hidden.show = Set(false);
    hidden.update(app.db()).await.unwrap();
    app.seed_entity("Emgrand", Some(root.id), None, &[]).await;

    let err = app.state.services.generator.generate().await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn failure_mid_run_rolls_back_everything() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Honda", None, None, &[]).await;
    app.seed_entity("Civic", Some(root.id), None, &[]).await;
    let color = app.seed_text_parameter("Color").await;
    let photo = app.seed_image("guard", "https://cdn.test/guard.jpg").await;
    let door_guard = app
        .seed_product(json!({
            "name": "Door Guard",
            "generatable": true,
            "image_ids": [photo.id],
            "parameter_values": [{ "parameter_id": color.id, "text_value": "black" }],
        }))
        .await;
    app.seed_product(json!({
        "name": "Trunk Liner",
        "generatable": true,
        "parameter_values": [{ "parameter_id": color.id, "text_value": "boom" }],
    }))
    .await;

    // Copying the second base product's values fails after the first pair is written
    app.exec_sql(
        "CREATE TRIGGER fail_generation BEFORE INSERT ON product_parameter_values \
         WHEN NEW.text_value = 'boom' BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
    )
    .await;

    let err = app.state.services.generator.generate().await.unwrap_err();
    assert_matches!(err, ServiceError::DatabaseError(_));
    assert_eq!(generated_count(&app).await, 0);
    // The first pair's gallery copy is undone too; only the base image is left
    let images = image::Entity::find().all(app.db()).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].product_id, Some(door_guard.id));
}

#[tokio::test]
async fn concurrent_runs_serialize() {
    let app = TestApp::new().await;
    let root = app.seed_entity("BMW", None, None, &[]).await;
    app.seed_entity("X3", Some(root.id), None, &[]).await;
    app.seed_entity("X5", Some(root.id), None, &[]).await;
    app.seed_base_product("Key Case", Some("12"), &[]).await;

    let generator = app.state.services.generator.clone();
    let (a, b) = tokio::join!(generator.generate(), generator.generate());
    let a: HashSet<Uuid> = a.unwrap().product_ids.into_iter().collect();
    let b: HashSet<Uuid> = b.unwrap().product_ids.into_iter().collect();

    assert_eq!(a, b);
    assert_eq!(generated_count(&app).await, 2);
}

#[tokio::test]
async fn generator_endpoints_return_empty_arrays_for_admins() {
    let app = TestApp::new().await;
    let root = app.seed_entity("Volvo", None, None, &[]).await;
    app.seed_entity("XC90", Some(root.id), None, &[]).await;
    app.seed_base_product("Tow Hook", Some("90"), &[]).await;

    let response = app
        .as_admin(Method::GET, "/api/v1/generate_products", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
    assert_eq!(generated_count(&app).await, 1);

    let response = app
        .as_admin(Method::GET, "/api/v1/delete_generated_products", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
    assert_eq!(generated_count(&app).await, 0);

    let _ = app
        .as_admin(Method::GET, "/api/v1/generate_products", None)
        .await;
    let response = app
        .as_admin(Method::DELETE, "/api/v1/generated_products", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(generated_count(&app).await, 0);
}

#[tokio::test]
async fn generator_endpoints_require_an_admin() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/generate_products", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::GET,
            "/api/v1/generate_products",
            None,
            Some(&app.user_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::GET,
            "/api/v1/delete_generated_products",
            None,
            Some("not-a-jwt"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
