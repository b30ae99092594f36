//! Route definitions for the `/recipes` resource.
//!
//! Reads are public; the description update and favoriting require
//! authentication (enforced by the `AuthUser` extractor in the
//! handlers).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// Routes mounted at `/recipes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list_recipes))
        // Static segments must come before the `{id}` capture.
        .route("/suggestions", get(recipes::suggestions))
        .route("/categories", get(recipes::list_categories))
        .route("/tags", get(recipes::list_tags))
        .route("/ingredients", get(recipes::list_ingredients))
        .route(
            "/{id}",
            get(recipes::get_recipe).patch(recipes::update_description),
        )
        .route("/{id}/versions", get(recipes::list_versions))
        .route("/{id}/favorite", post(recipes::favorite_recipe))
}
