use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{image_urls, priority_rank, validate_not_blank};
use crate::entities::category;
use crate::errors::ServiceError;

/// Input for creating or replacing a category
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub image_id: Option<Uuid>,
    #[serde(default = "default_show")]
    pub show: bool,
    pub slug: Option<String>,
}

fn default_show() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryChild {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: category::Model,
    pub image_url: Option<String>,
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: category::Model,
    pub image_url: Option<String>,
    pub children: Vec<CategoryChild>,
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Root categories ordered by priority, each with its children
    #[instrument(skip(self))]
    pub async fn list_parents(&self) -> Result<Vec<CategoryTree>, ServiceError> {
        let all = category::Entity::find()
            .order_by_asc(category::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut children: HashMap<Uuid, Vec<CategoryChild>> = HashMap::new();
        for c in all.iter() {
            if let Some(parent_id) = c.parent_id {
                children.entry(parent_id).or_default().push(CategoryChild {
                    id: c.id,
                    name: c.name.clone(),
                    created_at: c.created_at,
                });
            }
        }

        let mut roots: Vec<category::Model> =
            all.into_iter().filter(|c| c.parent_id.is_none()).collect();
        roots.sort_by_key(|c| priority_rank(c.priority.as_deref()));
        let urls = image_urls(&*self.db, roots.iter().filter_map(|c| c.image_id)).await?;

        Ok(roots
            .into_iter()
            .map(|category| CategoryTree {
                image_url: category.image_id.and_then(|id| urls.get(&id).cloned()),
                children: children.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CategoryView>, ServiceError> {
        let all = category::Entity::find()
            .order_by_asc(category::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let names: HashMap<Uuid, String> = all.iter().map(|c| (c.id, c.name.clone())).collect();
        let urls = image_urls(&*self.db, all.iter().filter_map(|c| c.image_id)).await?;

        Ok(all
            .into_iter()
            .map(|category| CategoryView {
                image_url: category.image_id.and_then(|id| urls.get(&id).cloned()),
                parent_name: category.parent_id.and_then(|id| names.get(&id).cloned()),
                category,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CategoryInput) -> Result<category::Model, ServiceError> {
        input.validate()?;
        if let Some(parent_id) = input.parent_id {
            self.get(parent_id).await?;
        }

        let category = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            parent_id: Set(input.parent_id),
            description: Set(input.description),
            priority: Set(input.priority),
            image_id: Set(input.image_id),
            show: Set(input.show),
            slug: Set(input.slug),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;
        if input.parent_id == Some(id) {
            return Err(ServiceError::InvalidInput(
                "a category cannot be its own parent".to_string(),
            ));
        }

        let mut category: category::ActiveModel = self.get(id).await?.into();
        category.name = Set(input.name.trim().to_string());
        category.parent_id = Set(input.parent_id);
        category.description = Set(input.description);
        category.priority = Set(input.priority);
        category.image_id = Set(input.image_id);
        category.show = Set(input.show);
        category.slug = Set(input.slug);

        let category = category.update(&*self.db).await?;
        info!(category_id = %id, "Updated category");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = category::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Category {} not found", id)));
        }
        info!(category_id = %id, "Deleted category");
        Ok(())
    }
}
