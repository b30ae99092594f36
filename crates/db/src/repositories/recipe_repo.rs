//! Repository for the `recipes` and `recipe_versions` tables.
//!
//! The faceted query compiler lives here: a normalized
//! [`RecipeQuery`] becomes one static SQL statement in which every
//! facet is a nullable bind — absent facets bind NULL and their
//! predicate collapses to true, present facets are conjoined with AND.

use forkful_core::query::{escape_pattern, MatchMode, RecipeQuery};
use forkful_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::{Recipe, RecipeSuggestion, RecipeVersion};

/// Column list for `recipes` queries.
const COLUMNS: &str =
    "id, title, description, category, tags, ingredients, steps, update_count, created_at";

/// Column list for `recipe_versions` queries.
const VERSION_COLUMNS: &str = "id, recipe_id, editor_name, description, created_at";

/// Conjoined facet predicate shared by the page and count queries.
///
/// - `$1` escaped search text (case-insensitive substring on title)
/// - `$2` category equality
/// - `$3`/`$4` tags containment (ALL) / overlap (ANY)
/// - `$5`/`$6` ingredients containment (ALL) / overlap (ANY)
/// - `$7` exact step count
const FILTER: &str = "($1::TEXT IS NULL OR title ~* $1) \
     AND ($2::TEXT IS NULL OR category = $2) \
     AND ($3::TEXT[] IS NULL OR tags @> $3) \
     AND ($4::TEXT[] IS NULL OR tags && $4) \
     AND ($5::TEXT[] IS NULL OR ingredients @> $5) \
     AND ($6::TEXT[] IS NULL OR ingredients && $6) \
     AND ($7::INT IS NULL OR cardinality(steps) = $7)";

/// Provides faceted query, suggestion, and mutation operations for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    // -----------------------------------------------------------------------
    // Faceted query
    // -----------------------------------------------------------------------

    /// Execute a faceted query, returning the page of rows and the
    /// total match count for the same predicate.
    pub async fn query_page(
        pool: &PgPool,
        query: &RecipeQuery,
    ) -> Result<(Vec<Recipe>, i64), sqlx::Error> {
        let search = query.search.as_deref().map(escape_pattern);
        let (tags_all, tags_any) = split_by_mode(query.tags.as_ref(), query.tag_match);
        let (ing_all, ing_any) = split_by_mode(query.ingredients.as_ref(), query.ingredient_match);

        let sql = format!(
            "SELECT {COLUMNS} FROM recipes WHERE {FILTER} \
             ORDER BY {order} LIMIT $8 OFFSET $9",
            order = order_clause(query),
        );

        let items = sqlx::query_as::<_, Recipe>(&sql)
            .bind(&search)
            .bind(&query.category)
            .bind(&tags_all)
            .bind(&tags_any)
            .bind(&ing_all)
            .bind(&ing_any)
            .bind(query.number_of_steps)
            .bind(query.limit)
            .bind(query.offset())
            .fetch_all(pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM recipes WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&search)
            .bind(&query.category)
            .bind(&tags_all)
            .bind(&tags_any)
            .bind(&ing_all)
            .bind(&ing_any)
            .bind(query.number_of_steps)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Fetch a single recipe by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipe>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
        sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Suggestions
    // -----------------------------------------------------------------------

    /// Title suggestions for search-as-you-type.
    ///
    /// The free text is escaped here before it becomes a pattern; the
    /// caller passes it verbatim.
    pub async fn suggest(
        pool: &PgPool,
        q: &str,
        limit: i64,
    ) -> Result<Vec<RecipeSuggestion>, sqlx::Error> {
        sqlx::query_as::<_, RecipeSuggestion>(
            "SELECT id, title, category FROM recipes \
             WHERE title ~* $1 \
             ORDER BY title ASC \
             LIMIT $2",
        )
        .bind(escape_pattern(q))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Whole-collection facet lookups
    // -----------------------------------------------------------------------

    /// Distinct category labels across all recipes.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT category FROM recipes WHERE category <> '' ORDER BY category",
        )
        .fetch_all(pool)
        .await
    }

    /// Distinct tag labels across all recipes.
    pub async fn list_tags(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT unnest(tags) FROM recipes ORDER BY 1")
            .fetch_all(pool)
            .await
    }

    /// Distinct ingredient labels across all recipes.
    pub async fn list_ingredients(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT unnest(ingredients) FROM recipes ORDER BY 1")
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Apply a description edit atomically: set the description, bump
    /// `update_count`, and append one version snapshot — all in a
    /// single transaction so a store failure leaves no partial state.
    ///
    /// Returns `None` (and writes nothing) when the recipe does not exist.
    pub async fn update_description(
        pool: &PgPool,
        recipe_id: DbId,
        description: &str,
        editor_name: &str,
    ) -> Result<Option<(Recipe, RecipeVersion)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            "UPDATE recipes \
             SET description = $2, update_count = update_count + 1 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(recipe_id)
            .bind(description)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(recipe) = recipe else {
            // Dropping the open transaction rolls it back.
            return Ok(None);
        };

        let sql = format!(
            "INSERT INTO recipe_versions (recipe_id, editor_name, description) \
             VALUES ($1, $2, $3) \
             RETURNING {VERSION_COLUMNS}"
        );
        let version = sqlx::query_as::<_, RecipeVersion>(&sql)
            .bind(recipe_id)
            .bind(editor_name)
            .bind(description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((recipe, version)))
    }

    /// List the full edit history of a recipe, oldest first.
    pub async fn list_versions(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<RecipeVersion>, sqlx::Error> {
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM recipe_versions \
             WHERE recipe_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, RecipeVersion>(&sql)
            .bind(recipe_id)
            .fetch_all(pool)
            .await
    }
}

/// Route a multi-valued facet to the containment (ALL) or overlap (ANY)
/// bind; the other side binds NULL and its predicate collapses.
fn split_by_mode(
    values: Option<&Vec<String>>,
    mode: MatchMode,
) -> (Option<Vec<String>>, Option<Vec<String>>) {
    match (values, mode) {
        (Some(v), MatchMode::All) => (Some(v.clone()), None),
        (Some(v), MatchMode::Any) => (None, Some(v.clone())),
        (None, _) => (None, None),
    }
}

/// Compile the ORDER BY clause from the whitelisted sort key.
///
/// An unset key means store insertion order; the serial id stands in
/// for it and also tie-breaks every explicit sort.
fn order_clause(query: &RecipeQuery) -> String {
    match query.sort_by {
        Some(key) => format!("{} {}, id ASC", key.column(), query.order.as_sql()),
        None => format!("id {}", query.order.as_sql()),
    }
}
