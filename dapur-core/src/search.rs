//! Client-side filtering of the bundled recipe catalog

use anyhow::{Context, Result};

use crate::storage::types::RecipeSummary;

/// Catalog categories, in the order the category picker shows them
pub const CATEGORIES: [&str; 6] = [
    "Makanan Berat",
    "Makanan Ringan",
    "Minuman",
    "Dessert",
    "Soup",
    "Salad",
];

/// Parse a catalog file: a JSON array of recipe summaries
pub fn load_catalog(json: &str) -> Result<Vec<RecipeSummary>> {
    serde_json::from_str(json).context("Failed to parse recipe catalog")
}

/// Category plus free-text filter over recipe titles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Exact category, compared case-insensitively; `None` matches every category
    pub category: Option<String>,
    /// Substring of the title, compared case-insensitively; empty matches everything
    pub text: String,
}

impl RecipeQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            category: None,
            text: text.into(),
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matches(&self, recipe: &RecipeSummary) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| c.to_lowercase() == recipe.category.to_lowercase());

        category_ok && recipe.title.to_lowercase().contains(&self.text.to_lowercase())
    }

    /// Matching recipes in catalog order
    pub fn filter<'a>(&self, catalog: &'a [RecipeSummary]) -> Vec<&'a RecipeSummary> {
        catalog.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<RecipeSummary> {
        load_catalog(
            r#"[
                {"id": 1, "title": "Nasi Goreng", "category": "Makanan Berat"},
                {"id": 2, "title": "Es Cendol", "category": "Minuman"},
                {"id": 3, "title": "Mie Goreng Jawa", "category": "Makanan Berat"},
                {"id": 4, "title": "Pisang Goreng", "category": "Makanan Ringan"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let catalog = catalog();
        let hits = RecipeQuery::new("GORENG").filter(&catalog);
        let titles: Vec<_> = hits.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Nasi Goreng", "Mie Goreng Jawa", "Pisang Goreng"]);
    }

    #[test]
    fn test_category_narrows() {
        let catalog = catalog();
        let hits = RecipeQuery::new("goreng").in_category("makanan berat").filter(&catalog);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_empty_text_matches_whole_category() {
        let catalog = catalog();
        let hits = RecipeQuery::default().in_category("Minuman").filter(&catalog);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Es Cendol");
    }

    #[test]
    fn test_bad_catalog() {
        assert!(load_catalog("{\"id\": 1}").is_err());
    }
}
