// Derived product generation
pub mod generator;

// Catalog tree
pub mod catalog_entities;
pub mod categories;

// Catalog content
pub mod articles;
pub mod brands;
pub mod images;
pub mod parameter_groups;
pub mod parameters;
pub mod products;

// Accounts
pub mod users;

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;
use validator::ValidationError;

use crate::entities::image;
use crate::errors::ServiceError;

/// Rejects empty or whitespace-only strings.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Numeric sort key for text priorities; missing or malformed values sort last.
pub(crate) fn priority_rank(priority: Option<&str>) -> i64 {
    priority
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(i64::MAX)
}

/// Resolves image ids to their URLs in one query.
pub(crate) async fn image_urls<C, I>(conn: &C, ids: I) -> Result<HashMap<Uuid, String>, ServiceError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let images = image::Entity::find()
        .filter(image::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(images
        .into_iter()
        .map(|image| (image.id, image.image_url))
        .collect())
}
