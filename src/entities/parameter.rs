use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StringList;

/// How a parameter value is stored on `product_parameter_values`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterType {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "bool")]
    Bool,
    #[sea_orm(string_value = "selectable")]
    Selectable,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "parameters")]
#[schema(as = Parameter)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    pub parameter_group_id: Option<Uuid>,
    /// Allowed values for `selectable` parameters
    #[sea_orm(column_type = "Json")]
    pub selectables: StringList,
    /// Sort key, numeric text
    pub priority: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parameter_group::Entity",
        from = "Column::ParameterGroupId",
        to = "super::parameter_group::Column::Id"
    )]
    ParameterGroup,
}

impl Related<super::parameter_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParameterGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
