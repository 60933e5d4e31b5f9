use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::parameters::parameters_for_category;
use super::{image_urls, validate_not_blank};
use crate::entities::{
    brand, catalog_entity, category, image, parameter, product, product_parameter_value,
    StringList,
};
use crate::errors::ServiceError;

const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ParameterValueInput {
    pub parameter_id: Uuid,
    pub text_value: Option<String>,
    pub bool_value: Option<bool>,
    pub selectable_value: Option<String>,
}

/// Input for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    #[validate(custom = "validate_not_blank")]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub info: Option<String>,
    pub price: Option<String>,
    pub count: Option<String>,
    pub position: Option<String>,
    pub code: Option<String>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub image_id: Option<Uuid>,
    #[serde(default)]
    pub keywords: StringList,
    #[serde(default)]
    pub generatable: bool,
    #[serde(default = "default_show")]
    pub show: bool,
    /// Gallery images to attach to the product
    #[serde(default)]
    pub image_ids: Vec<Uuid>,
    #[serde(default)]
    pub parameter_values: Vec<ParameterValueInput>,
}

fn default_show() -> bool {
    true
}

/// Product with its gallery, parameter values and resolved references
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: product::Model,
    pub image_url: Option<String>,
    pub brand_name: Option<String>,
    pub images: Vec<image::Model>,
    pub image_ids: Vec<Uuid>,
    pub parameter_values: Vec<product_parameter_value::Model>,
    /// Parameter definitions of the product's root category
    pub parameters: Vec<parameter::Model>,
}

/// Folds text for search: lowercase, Arabic yeh/kaf to their Persian forms,
/// Persian and Arabic-Indic digits to ASCII, ZWNJ to a space.
pub fn normalize_search(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{064A}' => '\u{06CC}',
            '\u{0643}' => '\u{06A9}',
            '\u{200C}' => ' ',
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductDetail>, ServiceError> {
        let products = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        assemble(&*self.db, products).await
    }

    /// Shown products created within the last 30 days, oldest first
    #[instrument(skip(self))]
    pub async fn recently_added(&self) -> Result<Vec<ProductDetail>, ServiceError> {
        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let products = product::Entity::find()
            .filter(product::Column::Show.eq(true))
            .filter(product::Column::CreatedAt.gte(since))
            .order_by_asc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        assemble(&*self.db, products).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<ProductDetail, ServiceError> {
        let product = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;
        self.detail_with_parameters(product).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<ProductDetail, ServiceError> {
        let product = product::Entity::find()
            .filter(product::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product with slug '{}' not found", slug))
            })?;
        self.detail_with_parameters(product).await
    }

    async fn detail_with_parameters(
        &self,
        product: product::Model,
    ) -> Result<ProductDetail, ServiceError> {
        let category = match product.category_id {
            Some(category_id) => category::Entity::find_by_id(category_id)
                .one(&*self.db)
                .await?,
            None => None,
        };

        let mut detail = assemble(&*self.db, vec![product])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::InternalError("product detail lost".to_string()))?;
        if let Some(category) = category {
            detail.parameters = parameters_for_category(&*self.db, &category).await?;
        }
        Ok(detail)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            slug: Set(input.slug),
            description: Set(input.description),
            info: Set(input.info),
            price: Set(input.price),
            count: Set(input.count),
            position: Set(input.position),
            code: Set(input.code),
            category_id: Set(input.category_id),
            brand_id: Set(input.brand_id),
            image_id: Set(input.image_id),
            keywords: Set(input.keywords),
            generatable: Set(input.generatable),
            generated: Set(false),
            show: Set(input.show),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        attach_images(&txn, product.id, &input.image_ids).await?;
        upsert_parameter_values(&txn, product.id, input.parameter_values).await?;

        txn.commit().await?;

        info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    /// Replaces the product's fields and gallery; parameter values are upserted.
    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: Uuid, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let existing = product::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        let mut product: product::ActiveModel = existing.into();
        product.name = Set(input.name.trim().to_string());
        product.slug = Set(input.slug);
        product.description = Set(input.description);
        product.info = Set(input.info);
        product.price = Set(input.price);
        product.count = Set(input.count);
        product.position = Set(input.position);
        product.code = Set(input.code);
        product.category_id = Set(input.category_id);
        product.brand_id = Set(input.brand_id);
        product.image_id = Set(input.image_id);
        product.keywords = Set(input.keywords);
        product.generatable = Set(input.generatable);
        product.show = Set(input.show);
        let product = product.update(&txn).await?;

        detach_images(&txn, id).await?;
        attach_images(&txn, id, &input.image_ids).await?;
        upsert_parameter_values(&txn, id, input.parameter_values).await?;

        txn.commit().await?;

        info!(product_id = %id, "Updated product");
        Ok(product)
    }

    /// Deletes the product; its gallery images survive unattached.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        detach_images(&txn, id).await?;
        let result = product::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Product {} not found", id)));
        }

        txn.commit().await?;
        info!(product_id = %id, "Deleted product");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn in_category(&self, category_id: Uuid) -> Result<Vec<ProductDetail>, ServiceError> {
        let mut ids: Vec<Uuid> = category::Entity::find()
            .filter(category::Column::ParentId.eq(category_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        ids.push(category_id);

        let products = product::Entity::find()
            .filter(product::Column::CategoryId.is_in(ids))
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        assemble(&*self.db, products).await
    }

    /// Generated products whose generator is the entity or one of its children
    #[instrument(skip(self))]
    pub async fn in_entity(&self, entity_id: Uuid) -> Result<Vec<ProductDetail>, ServiceError> {
        let mut ids: Vec<Uuid> = catalog_entity::Entity::find()
            .filter(catalog_entity::Column::ParentId.eq(entity_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        ids.push(entity_id);

        let products = product::Entity::find()
            .filter(product::Column::Generated.eq(true))
            .filter(product::Column::EntityId.is_in(ids))
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?;
        assemble(&*self.db, products).await
    }

    /// Shown products whose name contains the query, newest update first.
    ///
    /// Matching runs on normalized text so Arabic and Persian spellings of
    /// the same word find each other. The folding has no portable SQL
    /// equivalent, so only `(id, name)` of shown products is scanned in
    /// memory and full rows are loaded for the hits.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<ProductDetail>, ServiceError> {
        let needle = normalize_search(query.trim());
        if needle.trim().is_empty() {
            return Ok(Vec::new());
        }

        let candidates: Vec<(Uuid, String)> = product::Entity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .filter(product::Column::Show.eq(true))
            .order_by_desc(product::Column::UpdatedAt)
            .into_tuple()
            .all(&*self.db)
            .await?;
        let hits: Vec<Uuid> = candidates
            .into_iter()
            .filter(|(_, name)| normalize_search(name).contains(&needle))
            .map(|(id, _)| id)
            .collect();
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let rank: HashMap<Uuid, usize> = hits.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut products = product::Entity::find()
            .filter(product::Column::Id.is_in(hits))
            .all(&*self.db)
            .await?;
        products.sort_by_key(|p| rank.get(&p.id).copied().unwrap_or(usize::MAX));

        debug!(query = %query, hits = products.len(), "Product search");
        assemble(&*self.db, products).await
    }
}

/// Loads galleries, parameter values, primary image URLs and brand names for
/// a batch of products, preserving their order.
async fn assemble<C>(
    conn: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductDetail>, ServiceError>
where
    C: ConnectionTrait,
{
    if products.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

    let mut galleries: HashMap<Uuid, Vec<image::Model>> = HashMap::new();
    for img in image::Entity::find()
        .filter(image::Column::ProductId.is_in(ids.clone()))
        .order_by_asc(image::Column::CreatedAt)
        .all(conn)
        .await?
    {
        if let Some(product_id) = img.product_id {
            galleries.entry(product_id).or_default().push(img);
        }
    }

    let mut values: HashMap<Uuid, Vec<product_parameter_value::Model>> = HashMap::new();
    for value in product_parameter_value::Entity::find()
        .filter(product_parameter_value::Column::ProductId.is_in(ids))
        .order_by_asc(product_parameter_value::Column::CreatedAt)
        .all(conn)
        .await?
    {
        values.entry(value.product_id).or_default().push(value);
    }

    let urls = image_urls(conn, products.iter().filter_map(|p| p.image_id)).await?;

    let mut brand_ids: Vec<Uuid> = products.iter().filter_map(|p| p.brand_id).collect();
    brand_ids.sort_unstable();
    brand_ids.dedup();
    let brands: HashMap<Uuid, String> = if brand_ids.is_empty() {
        HashMap::new()
    } else {
        brand::Entity::find()
            .filter(brand::Column::Id.is_in(brand_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect()
    };

    Ok(products
        .into_iter()
        .map(|product| {
            let images = galleries.remove(&product.id).unwrap_or_default();
            ProductDetail {
                image_url: product.image_id.and_then(|id| urls.get(&id).cloned()),
                brand_name: product.brand_id.and_then(|id| brands.get(&id).cloned()),
                image_ids: images.iter().map(|i| i.id).collect(),
                images,
                parameter_values: values.remove(&product.id).unwrap_or_default(),
                parameters: Vec::new(),
                product,
            }
        })
        .collect())
}

async fn attach_images<C>(conn: &C, product_id: Uuid, image_ids: &[Uuid]) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if image_ids.is_empty() {
        return Ok(());
    }
    image::Entity::update_many()
        .col_expr(image::Column::ProductId, Expr::value(product_id))
        .filter(image::Column::Id.is_in(image_ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(())
}

async fn detach_images<C>(conn: &C, product_id: Uuid) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    image::Entity::update_many()
        .col_expr(image::Column::ProductId, Expr::value(Option::<Uuid>::None))
        .filter(image::Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn upsert_parameter_values<C>(
    conn: &C,
    product_id: Uuid,
    inputs: Vec<ParameterValueInput>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if inputs.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let rows = inputs.into_iter().map(|v| product_parameter_value::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        parameter_id: Set(v.parameter_id),
        text_value: Set(v.text_value),
        bool_value: Set(v.bool_value),
        selectable_value: Set(v.selectable_value),
        created_at: Set(now),
    });

    product_parameter_value::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                product_parameter_value::Column::ProductId,
                product_parameter_value::Column::ParameterId,
            ])
            .update_columns([
                product_parameter_value::Column::TextValue,
                product_parameter_value::Column::BoolValue,
                product_parameter_value::Column::SelectableValue,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Brake PADS", "brake pads")]
    #[case("\u{0643}\u{064A}\u{0641}", "\u{06A9}\u{06CC}\u{0641}")]
    #[case("\u{06F2}\u{06F0}\u{06F2}\u{06F4}", "2024")]
    #[case("\u{0661}\u{0662}", "12")]
    #[case("\u{0645}\u{06CC}\u{200C}\u{0634}\u{0648}\u{062F}", "\u{0645}\u{06CC} \u{0634}\u{0648}\u{062F}")]
    fn normalizes_search_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_search(input), expected);
    }

    #[test]
    fn input_defaults_apply() {
        let input: ProductInput = serde_json::from_str(r#"{"name":"Seat cover"}"#).unwrap();
        assert!(input.show);
        assert!(!input.generatable);
        assert!(input.image_ids.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn blank_slug_is_rejected() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name":"Seat cover","slug":"  "}"#).unwrap();
        assert!(input.validate().is_err());
    }
}
