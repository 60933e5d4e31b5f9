use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_not_blank;
use crate::entities::image;
use crate::errors::ServiceError;

/// Image metadata. The binary itself lives on the static file host; only its URL is stored.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ImageInput {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(max = 2048), custom = "validate_not_blank")]
    pub image_url: String,
    pub product_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct ImageService {
    db: Arc<DatabaseConnection>,
}

impl ImageService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<image::Model>, ServiceError> {
        Ok(image::Entity::find()
            .order_by_desc(image::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<image::Model, ServiceError> {
        image::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Image {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ImageInput) -> Result<image::Model, ServiceError> {
        input.validate()?;

        let image = image::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            image_url: Set(input.image_url),
            product_id: Set(input.product_id),
            category_id: Set(input.category_id),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(image_id = %image.id, "Registered image");
        Ok(image)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: Uuid, input: ImageInput) -> Result<image::Model, ServiceError> {
        input.validate()?;

        let mut image: image::ActiveModel = self.get(id).await?.into();
        image.name = Set(input.name);
        image.image_url = Set(input.image_url);
        image.product_id = Set(input.product_id);
        image.category_id = Set(input.category_id);
        Ok(image.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = image::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Image {} not found", id)));
        }
        Ok(())
    }
}
