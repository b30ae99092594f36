//! Structured payload delivered to client devices.

use forkful_core::types::DbId;
use serde::Serialize;

/// Wire value of the payload `type` field for recipe updates.
pub const KIND_RECIPE_UPDATE: &str = "recipe-update";

/// Maximum length (in characters) of the title excerpt carried in the
/// payload and the human-readable message.
const EXCERPT_MAX_CHARS: usize = 60;

/// The notification body a receiving client renders; on click it
/// navigates to `url`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotification {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub recipe_id: DbId,
    pub recipe_title: String,
    pub user_name: String,
    pub message: String,
    pub url: String,
}

impl UpdateNotification {
    /// Build the payload for a recipe-description update.
    pub fn recipe_update(recipe_id: DbId, recipe_title: &str, editor_name: &str) -> Self {
        let excerpt = excerpt(recipe_title, EXCERPT_MAX_CHARS);
        Self {
            title: "Recipe updated".to_string(),
            kind: KIND_RECIPE_UPDATE,
            recipe_id,
            recipe_title: excerpt.clone(),
            user_name: editor_name.to_string(),
            message: format!("{editor_name} updated \"{excerpt}\""),
            url: format!("/recipes/{recipe_id}"),
        }
    }
}

/// Truncate on a character boundary, appending an ellipsis when
/// anything was cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
