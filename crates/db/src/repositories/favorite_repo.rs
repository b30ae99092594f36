//! Repository for the `favorites` table.

use forkful_core::types::DbId;
use sqlx::PgPool;

/// Provides operations on the `(user, recipe)` favorite relation.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Create a favorite, returning the generated id.
    ///
    /// A duplicate `(user, recipe)` pair violates
    /// `uq_favorites_user_recipe` and surfaces as a database error for
    /// the API layer to classify.
    pub async fn create(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO favorites (user_id, recipe_id) \
             VALUES ($1, $2) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await
    }
}
