//! Repository for the `push_endpoints` table.

use forkful_core::types::DbId;
use sqlx::PgPool;

use crate::models::push_endpoint::PushEndpoint;

/// Column list for `push_endpoints` queries.
const COLUMNS: &str = "id, user_id, payload, created_at";

/// Provides registration, lookup, and pruning of push endpoints.
pub struct PushEndpointRepo;

impl PushEndpointRepo {
    /// Register an opaque endpoint payload for a user, returning the
    /// generated id.
    pub async fn register(
        pool: &PgPool,
        user_id: DbId,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO push_endpoints (user_id, payload) \
             VALUES ($1, $2) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// All endpoints belonging to users who favorited the recipe.
    ///
    /// This is the interested-party set for the update fan-out: the
    /// favoriter user ids joined against their registered devices.
    pub async fn list_for_recipe_favoriters(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<PushEndpoint>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM push_endpoints \
             WHERE user_id IN (SELECT user_id FROM favorites WHERE recipe_id = $1) \
             ORDER BY id"
        );
        sqlx::query_as::<_, PushEndpoint>(&sql)
            .bind(recipe_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an endpoint that delivery proved permanently gone.
    ///
    /// Returns `true` if a row was removed. Racing a concurrent read is
    /// safe: it is a single-record delete.
    pub async fn delete(pool: &PgPool, endpoint_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_endpoints WHERE id = $1")
            .bind(endpoint_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
