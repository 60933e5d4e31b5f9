use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{priority_rank, validate_not_blank};
use crate::entities::{category, parameter, parameter::ParameterType, parameter_group, StringList};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ParameterInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    pub parameter_group_id: Option<Uuid>,
    #[serde(default)]
    pub selectables: StringList,
    pub priority: Option<String>,
}

impl ParameterInput {
    fn check_selectables(&self) -> Result<(), ServiceError> {
        if self.parameter_type == ParameterType::Selectable && self.selectables.is_empty() {
            return Err(ServiceError::ValidationError(
                "selectable parameters need at least one selectable value".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters attached to the category's root: its parent, or itself when it has none.
///
/// Ordered by numeric priority.
pub async fn parameters_for_category<C>(
    conn: &C,
    category: &category::Model,
) -> Result<Vec<parameter::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let root_id = category.parent_id.unwrap_or(category.id);

    let group_ids: Vec<Uuid> = parameter_group::Entity::find()
        .filter(parameter_group::Column::CategoryId.eq(root_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    if group_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut parameters = parameter::Entity::find()
        .filter(parameter::Column::ParameterGroupId.is_in(group_ids))
        .order_by_asc(parameter::Column::CreatedAt)
        .all(conn)
        .await?;
    parameters.sort_by_key(|p| priority_rank(p.priority.as_deref()));
    Ok(parameters)
}

#[derive(Clone)]
pub struct ParameterService {
    db: Arc<DatabaseConnection>,
}

impl ParameterService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<parameter::Model>, ServiceError> {
        let mut parameters = parameter::Entity::find()
            .order_by_asc(parameter::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        parameters.sort_by_key(|p| priority_rank(p.priority.as_deref()));
        Ok(parameters)
    }

    #[instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<parameter::Model>, ServiceError> {
        let category = category::Entity::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", category_id)))?;

        parameters_for_category(&*self.db, &category).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<parameter::Model, ServiceError> {
        parameter::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Parameter {} not found", id)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ParameterInput) -> Result<parameter::Model, ServiceError> {
        input.validate()?;
        input.check_selectables()?;

        let parameter = parameter::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            parameter_type: Set(input.parameter_type),
            parameter_group_id: Set(input.parameter_group_id),
            selectables: Set(input.selectables),
            priority: Set(input.priority),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(parameter_id = %parameter.id, "Created parameter");
        Ok(parameter)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(
        &self,
        id: Uuid,
        input: ParameterInput,
    ) -> Result<parameter::Model, ServiceError> {
        input.validate()?;
        input.check_selectables()?;

        let mut parameter: parameter::ActiveModel = self.get(id).await?.into();
        parameter.name = Set(input.name.trim().to_string());
        parameter.description = Set(input.description);
        parameter.parameter_type = Set(input.parameter_type);
        parameter.parameter_group_id = Set(input.parameter_group_id);
        parameter.selectables = Set(input.selectables);
        parameter.priority = Set(input.priority);
        Ok(parameter.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = parameter::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Parameter {} not found", id)));
        }
        Ok(())
    }
}
