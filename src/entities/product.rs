use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StringList;

/// Catalog product.
///
/// Hand-made products have `base_product_id`/`generator_id` unset. Derived
/// products carry both, and that pair is their identity across generation
/// runs.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "products")]
#[schema(as = Product)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub info: Option<String>,

    /// Integer amount stored as text
    pub price: Option<String>,

    pub count: Option<String>,
    pub position: Option<String>,
    pub code: Option<String>,

    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    /// Generator entity for derived products
    pub entity_id: Option<Uuid>,
    /// Primary image
    pub image_id: Option<Uuid>,

    pub slug: Option<String>,

    #[sea_orm(column_type = "Json")]
    pub keywords: StringList,

    pub generatable: bool,
    pub generated: bool,
    pub show: bool,

    pub base_product_id: Option<Uuid>,
    pub generator_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id"
    )]
    PrimaryImage,
    #[sea_orm(has_many = "super::product_parameter_value::Entity")]
    ParameterValues,
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrimaryImage.def()
    }
}

impl Related<super::product_parameter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParameterValues.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
            if let ActiveValue::NotSet = active_model.keywords {
                active_model.keywords = Set(StringList::default());
            }
            if let ActiveValue::NotSet = active_model.generatable {
                active_model.generatable = Set(false);
            }
            if let ActiveValue::NotSet = active_model.generated {
                active_model.generated = Set(false);
            }
            if let ActiveValue::NotSet = active_model.show {
                active_model.show = Set(true);
            }
            active_model.created_at = Set(now);
        }

        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
