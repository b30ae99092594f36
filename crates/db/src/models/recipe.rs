//! Recipe entity models and DTOs.

use forkful_core::pagination::PageInfo;
use forkful_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `recipes` table.
///
/// `update_count` is a monotonic counter incremented once per accepted
/// mutation and always equals the number of `recipe_versions` rows.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub update_count: i32,
    pub created_at: Timestamp,
}

/// A row from the `recipe_versions` table: one immutable snapshot per
/// accepted description edit, ordered by serial id.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeVersion {
    pub id: DbId,
    pub recipe_id: DbId,
    pub editor_name: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// Typeahead suggestion row (`GET /recipes/suggestions`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeSuggestion {
    pub id: DbId,
    pub title: String,
    pub category: String,
}

/// One page of recipe query results, in the wire shape of the query
/// endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub items: Vec<Recipe>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl RecipePage {
    /// Assemble a page envelope from fetched items and the shared
    /// pagination math.
    pub fn assemble(items: Vec<Recipe>, total: i64, page: i64, limit: i64) -> Self {
        let info = PageInfo::compute(total, page, limit);
        Self {
            items,
            total,
            total_pages: info.total_pages,
            current_page: page,
            limit,
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
        }
    }
}

/// Body of `PATCH /recipes/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescription {
    #[validate(length(min = 10, message = "description must be at least 10 characters"))]
    pub description: String,
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_serializes_camel_case() {
        let recipe = Recipe {
            id: 1,
            title: "Pho".into(),
            description: "Broth and noodles".into(),
            category: "Soup".into(),
            tags: vec![],
            ingredients: vec![],
            steps: vec![],
            update_count: 2,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&recipe).unwrap();

        assert_eq!(json["updateCount"], 2);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("update_count").is_none());
    }

    #[test]
    fn version_serializes_camel_case() {
        let version = RecipeVersion {
            id: 5,
            recipe_id: 1,
            editor_name: "alice".into(),
            description: "Broth and noodles".into(),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&version).unwrap();

        assert_eq!(json["recipeId"], 1);
        assert_eq!(json["editorName"], "alice");
        assert!(json.get("editor_name").is_none());
    }
}
