//! Interested-party resolution for recipe updates.

use forkful_core::types::DbId;
use forkful_db::models::push_endpoint::PushEndpoint;
use forkful_db::repositories::PushEndpointRepo;
use forkful_db::DbPool;

/// Resolve every endpoint that must be notified about an update to
/// `recipe_id`: the registered devices of all favoriting users.
///
/// An empty result means nobody favorited the recipe; callers skip the
/// dispatcher entirely in that case.
pub async fn resolve_targets(
    pool: &DbPool,
    recipe_id: DbId,
) -> Result<Vec<PushEndpoint>, sqlx::Error> {
    PushEndpointRepo::list_for_recipe_favoriters(pool, recipe_id).await
}
