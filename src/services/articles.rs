use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{image_urls, validate_not_blank};
use crate::entities::{article, StringList};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ArticleInput {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    pub description: Option<String>,
    pub image_id: Option<Uuid>,
    pub slug: Option<String>,
    #[serde(default)]
    pub keywords: StringList,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: article::Model,
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct ArticleService {
    db: Arc<DatabaseConnection>,
}

impl ArticleService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn with_images(
        &self,
        articles: Vec<article::Model>,
    ) -> Result<Vec<ArticleView>, ServiceError> {
        let urls = image_urls(&*self.db, articles.iter().filter_map(|a| a.image_id)).await?;
        Ok(articles
            .into_iter()
            .map(|article| ArticleView {
                image_url: article.image_id.and_then(|id| urls.get(&id).cloned()),
                article,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ArticleView>, ServiceError> {
        let articles = article::Entity::find()
            .order_by_desc(article::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        self.with_images(articles).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<ArticleView, ServiceError> {
        let article = article::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Article {} not found", id)))?;
        let mut views = self.with_images(vec![article]).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::InternalError("article view lost".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<ArticleView, ServiceError> {
        let article = article::Entity::find()
            .filter(article::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Article with slug '{}' not found", slug))
            })?;
        let mut views = self.with_images(vec![article]).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::InternalError("article view lost".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn in_category(&self, category_id: Uuid) -> Result<Vec<ArticleView>, ServiceError> {
        let articles = article::Entity::find()
            .filter(article::Column::CategoryId.eq(category_id))
            .order_by_desc(article::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        self.with_images(articles).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ArticleInput) -> Result<article::Model, ServiceError> {
        input.validate()?;

        let article = article::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            image_id: Set(input.image_id),
            slug: Set(input.slug),
            keywords: Set(input.keywords),
            category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(article_id = %article.id, "Created article");
        Ok(article)
    }

    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: Uuid, input: ArticleInput) -> Result<article::Model, ServiceError> {
        input.validate()?;

        let existing = article::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Article {} not found", id)))?;

        let mut article: article::ActiveModel = existing.into();
        article.name = Set(input.name.trim().to_string());
        article.description = Set(input.description);
        article.image_id = Set(input.image_id);
        article.slug = Set(input.slug);
        article.keywords = Set(input.keywords);
        article.category_id = Set(input.category_id);
        Ok(article.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = article::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Article {} not found", id)));
        }
        Ok(())
    }
}
