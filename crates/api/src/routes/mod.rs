pub mod health;
pub mod push;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /recipes                    faceted query (GET)
/// /recipes/suggestions        title typeahead (GET)
/// /recipes/categories         distinct categories (GET)
/// /recipes/tags               distinct tags (GET)
/// /recipes/ingredients        distinct ingredients (GET)
/// /recipes/{id}               single recipe (GET), description update (PATCH)
/// /recipes/{id}/versions      edit history (GET)
/// /recipes/{id}/favorite      favorite (POST, requires auth)
///
/// /push/subscriptions         endpoint registration (POST, requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/recipes", recipes::router())
        .nest("/push", push::router())
}
