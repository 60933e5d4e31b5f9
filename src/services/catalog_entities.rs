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
use crate::entities::{catalog_entity, StringList};
use crate::errors::ServiceError;

/// Input for creating or replacing a catalog entity
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct EntityInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub image_id: Option<Uuid>,
    pub entity_slug: Option<String>,
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default)]
    pub keywords: StringList,
    /// Integer surcharge added to derived product prices
    pub price: Option<String>,
}

fn default_show() -> bool {
    true
}

/// Child entry nested under a root entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityChild {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub entity_slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&catalog_entity::Model> for EntityChild {
    fn from(model: &catalog_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            parent_id: model.parent_id,
            entity_slug: model.entity_slug.clone(),
            created_at: model.created_at,
        }
    }
}

/// Catalog entity with its resolved image and parent name
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityView {
    #[serde(flatten)]
    pub entity: catalog_entity::Model,
    pub image_url: Option<String>,
    pub parent_name: Option<String>,
}

/// Root entity with its direct children
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityTree {
    #[serde(flatten)]
    pub entity: catalog_entity::Model,
    pub image_url: Option<String>,
    pub children: Vec<EntityChild>,
}

#[derive(Clone)]
pub struct CatalogEntityService {
    db: Arc<DatabaseConnection>,
}

impl CatalogEntityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Root entities ordered by priority, each with its children
    #[instrument(skip(self))]
    pub async fn list_parents(&self) -> Result<Vec<EntityTree>, ServiceError> {
        let all = catalog_entity::Entity::find()
            .order_by_asc(catalog_entity::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut children: HashMap<Uuid, Vec<EntityChild>> = HashMap::new();
        for entity in all.iter() {
            if let Some(parent_id) = entity.parent_id {
                children.entry(parent_id).or_default().push(entity.into());
            }
        }

        let mut roots: Vec<catalog_entity::Model> =
            all.into_iter().filter(|e| e.parent_id.is_none()).collect();
        roots.sort_by_key(|e| priority_rank(e.priority.as_deref()));

        let urls = image_urls(&*self.db, roots.iter().filter_map(|e| e.image_id)).await?;

        Ok(roots
            .into_iter()
            .map(|entity| EntityTree {
                image_url: entity.image_id.and_then(|id| urls.get(&id).cloned()),
                children: children.remove(&entity.id).unwrap_or_default(),
                entity,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<EntityView>, ServiceError> {
        let all = catalog_entity::Entity::find()
            .order_by_asc(catalog_entity::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let names: HashMap<Uuid, String> = all.iter().map(|e| (e.id, e.name.clone())).collect();
        let urls = image_urls(&*self.db, all.iter().filter_map(|e| e.image_id)).await?;

        Ok(all
            .into_iter()
            .map(|entity| EntityView {
                image_url: entity.image_id.and_then(|id| urls.get(&id).cloned()),
                parent_name: entity.parent_id.and_then(|id| names.get(&id).cloned()),
                entity,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<catalog_entity::Model, ServiceError> {
        catalog_entity::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Entity {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<EntityView, ServiceError> {
        let entity = catalog_entity::Entity::find()
            .filter(catalog_entity::Column::EntitySlug.eq(slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Entity with slug '{}' not found", slug)))?;

        let parent_name = match entity.parent_id {
            Some(parent_id) => catalog_entity::Entity::find_by_id(parent_id)
                .one(&*self.db)
                .await?
                .map(|parent| parent.name),
            None => None,
        };
        let urls = image_urls(&*self.db, entity.image_id).await?;

        Ok(EntityView {
            image_url: entity.image_id.and_then(|id| urls.get(&id).cloned()),
            parent_name,
            entity,
        })
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: EntityInput) -> Result<catalog_entity::Model, ServiceError> {
        input.validate()?;
        if let Some(parent_id) = input.parent_id {
            self.get(parent_id).await?;
        }

        let entity = catalog_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            parent_id: Set(input.parent_id),
            description: Set(input.description),
            priority: Set(input.priority),
            image_id: Set(input.image_id),
            entity_slug: Set(input.entity_slug),
            show: Set(input.show),
            keywords: Set(input.keywords),
            price: Set(input.price),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(entity_id = %entity.id, "Created catalog entity");
        Ok(entity)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(
        &self,
        id: Uuid,
        input: EntityInput,
    ) -> Result<catalog_entity::Model, ServiceError> {
        input.validate()?;
        if input.parent_id == Some(id) {
            return Err(ServiceError::InvalidInput(
                "an entity cannot be its own parent".to_string(),
            ));
        }

        let mut entity: catalog_entity::ActiveModel = self.get(id).await?.into();
        entity.name = Set(input.name);
        entity.parent_id = Set(input.parent_id);
        entity.description = Set(input.description);
        entity.priority = Set(input.priority);
        entity.image_id = Set(input.image_id);
        entity.entity_slug = Set(input.entity_slug);
        entity.show = Set(input.show);
        entity.keywords = Set(input.keywords);
        entity.price = Set(input.price);

        let entity = entity.update(&*self.db).await?;
        info!(entity_id = %id, "Updated catalog entity");
        Ok(entity)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = catalog_entity::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Entity {} not found", id)));
        }
        info!(entity_id = %id, "Deleted catalog entity");
        Ok(())
    }
}
