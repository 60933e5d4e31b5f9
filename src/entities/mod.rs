//! sea-orm entities for the catalog tables.

pub mod article;
pub mod brand;
pub mod catalog_entity;
pub mod category;
pub mod image;
pub mod parameter;
pub mod parameter_group;
pub mod product;
pub mod product_parameter_value;
pub mod user;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ordered list of strings persisted as a JSON array (keywords, selectables).
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        StringList(values)
    }
}

impl<const N: usize> From<[&str; N]> for StringList {
    fn from(values: [&str; N]) -> Self {
        StringList(values.iter().map(|v| v.to_string()).collect())
    }
}

impl FromIterator<String> for StringList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        StringList(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StringList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_array() {
        let list = StringList::from(["red", "suv"]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["red","suv"]"#);

        let back: StringList = serde_json::from_str(r#"["a"]"#).unwrap();
        assert_eq!(back.0, vec!["a".to_string()]);
    }
}
