//! Recipe summaries as shown in lists and stored in recent searches

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Identified;

/// Recipe identifier.
///
/// The bundled catalog uses numbers and backend rows use strings; both are
/// accepted. A number and its decimal string are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Number(n) => write!(f, "{}", n),
            RecipeId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for RecipeId {
    fn from(n: u64) -> Self {
        RecipeId::Number(n)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        RecipeId::Text(s.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(s: String) -> Self {
        RecipeId::Text(s)
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
}

impl RecipeSummary {
    pub fn new(id: impl Into<RecipeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: String::new(),
            image_name: None,
            ingredients_count: None,
            cook_time: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

impl Identified for RecipeSummary {
    type Id = RecipeId;

    fn id(&self) -> &RecipeId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let json = r#"{"id":7,"title":"Soto Ayam","category":"Soup","imageName":"soto.jpg","ingredientsCount":12,"cookTime":"45 menit"}"#;
        let recipe: RecipeSummary = serde_json::from_str(json).unwrap();

        assert_eq!(recipe.id, RecipeId::Number(7));
        assert_eq!(recipe.image_name.as_deref(), Some("soto.jpg"));
        assert_eq!(recipe.ingredients_count, Some(12));
    }

    #[test]
    fn test_text_id() {
        let recipe: RecipeSummary =
            serde_json::from_str(r#"{"id":"a1b2","title":"Es Teler"}"#).unwrap();
        assert_eq!(recipe.id, RecipeId::from("a1b2"));
        assert_ne!(RecipeId::from(1), RecipeId::from("1"));
    }
}
