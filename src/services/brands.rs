use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_not_blank;
use crate::entities::brand;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BrandInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct BrandService {
    db: Arc<DatabaseConnection>,
}

impl BrandService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<brand::Model>, ServiceError> {
        Ok(brand::Entity::find()
            .order_by_asc(brand::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<brand::Model, ServiceError> {
        brand::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Brand {} not found", id)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: BrandInput) -> Result<brand::Model, ServiceError> {
        input.validate()?;

        let brand = brand::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(brand_id = %brand.id, "Created brand");
        Ok(brand)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: Uuid, input: BrandInput) -> Result<brand::Model, ServiceError> {
        input.validate()?;

        let mut brand: brand::ActiveModel = self.get(id).await?.into();
        brand.name = Set(input.name.trim().to_string());
        brand.description = Set(input.description);
        Ok(brand.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = brand::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Brand {} not found", id)));
        }
        info!(brand_id = %id, "Deleted brand");
        Ok(())
    }
}
