use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_not_blank;
use crate::entities::{category, parameter_group};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ParameterGroupInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub category_id: Option<Uuid>,
}

/// Parameter group with the name of the category it is attached to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParameterGroupView {
    #[serde(flatten)]
    pub group: parameter_group::Model,
    pub category_name: Option<String>,
}

#[derive(Clone)]
pub struct ParameterGroupService {
    db: Arc<DatabaseConnection>,
}

impl ParameterGroupService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ParameterGroupView>, ServiceError> {
        let rows = parameter_group::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(parameter_group::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(group, category)| ParameterGroupView {
                group,
                category_name: category.map(|c| c.name),
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<parameter_group::Model, ServiceError> {
        parameter_group::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Parameter group {} not found", id)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: ParameterGroupInput,
    ) -> Result<parameter_group::Model, ServiceError> {
        input.validate()?;

        let group = parameter_group::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            category_id: Set(input.category_id),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(group_id = %group.id, "Created parameter group");
        Ok(group)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(
        &self,
        id: Uuid,
        input: ParameterGroupInput,
    ) -> Result<parameter_group::Model, ServiceError> {
        input.validate()?;

        let mut group: parameter_group::ActiveModel = self.get(id).await?.into();
        group.name = Set(input.name.trim().to_string());
        group.category_id = Set(input.category_id);
        Ok(group.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = parameter_group::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Parameter group {} not found",
                id
            )));
        }
        Ok(())
    }
}
