//! Handlers for the recipe read and write paths.
//!
//! The read path is normalize -> compile -> paginate with the result
//! cache as a cross-cutting memoization layer. The write path is the
//! two-phase update coordinator: a transactional mutation followed by
//! a best-effort notification fan-out.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use forkful_core::error::CoreError;
use forkful_core::query::{RawRecipeQuery, RecipeQuery, MAX_SUGGESTION_LIMIT};
use forkful_core::types::DbId;
use forkful_db::models::recipe::{Recipe, RecipePage, RecipeSuggestion, UpdateDescription};
use forkful_db::repositories::{FavoriteRepo, RecipeRepo};
use forkful_push::{resolve_targets, UpdateNotification};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Faceted query
// ---------------------------------------------------------------------------

/// GET /api/v1/recipes
///
/// Faceted recipe listing. The query string is taken as raw pairs so
/// repeated keys (the `tags[]`/`ingredients[]` array form) survive;
/// parameters are then normalized (malformed facets silently dropped),
/// compiled into one conjoined predicate, and memoized for the
/// configured cache window.
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<RecipePage>> {
    let query = RecipeQuery::normalize(RawRecipeQuery::from_pairs(pairs));
    let key = query.cache_key();

    if let Some(page) = state.recipe_cache.get(&key).await {
        return Ok(Json(page));
    }

    let (items, total) = RecipeRepo::query_page(&state.pool, &query).await?;
    let page = RecipePage::assemble(items, total, query.page, query.limit);

    tracing::debug!(
        total = page.total,
        page = page.current_page,
        limit = page.limit,
        "Recipe query executed"
    );

    state.recipe_cache.insert(key, page.clone()).await;
    Ok(Json(page))
}

/// GET /api/v1/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Recipe>> {
    let recipe = RecipeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }))?;
    Ok(Json(recipe))
}

/// GET /api/v1/recipes/{id}/versions
///
/// Full edit history of a recipe, oldest first.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if RecipeRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }));
    }

    let versions = RecipeRepo::list_versions(&state.pool, id).await?;
    Ok(Json(versions))
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Query parameters for `GET /recipes/suggestions`.
///
/// `limit` arrives as a string so malformed values degrade to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/v1/recipes/suggestions
///
/// Title typeahead. An empty `q` yields an empty list without querying
/// the store; `limit` is capped at 10, and an explicit non-positive
/// limit asks for nothing and gets exactly that.
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> AppResult<Json<Vec<RecipeSuggestion>>> {
    let q = params.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let limit = params
        .limit
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(MAX_SUGGESTION_LIMIT);
    if limit <= 0 {
        return Ok(Json(Vec::new()));
    }
    let limit = limit.min(MAX_SUGGESTION_LIMIT);

    let results = RecipeRepo::suggest(&state.pool, q, limit).await?;
    Ok(Json(results))
}

// ---------------------------------------------------------------------------
// Whole-collection label lookups
// ---------------------------------------------------------------------------

/// GET /api/v1/recipes/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    if let Some(labels) = state.facet_cache.get("categories").await {
        return Ok(Json(labels));
    }
    let labels = RecipeRepo::list_categories(&state.pool).await?;
    state.facet_cache.insert("categories", labels.clone()).await;
    Ok(Json(labels))
}

/// GET /api/v1/recipes/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    if let Some(labels) = state.facet_cache.get("tags").await {
        return Ok(Json(labels));
    }
    let labels = RecipeRepo::list_tags(&state.pool).await?;
    state.facet_cache.insert("tags", labels.clone()).await;
    Ok(Json(labels))
}

/// GET /api/v1/recipes/ingredients
pub async fn list_ingredients(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    if let Some(labels) = state.facet_cache.get("ingredients").await {
        return Ok(Json(labels));
    }
    let labels = RecipeRepo::list_ingredients(&state.pool).await?;
    state.facet_cache.insert("ingredients", labels.clone()).await;
    Ok(Json(labels))
}

// ---------------------------------------------------------------------------
// Update coordinator
// ---------------------------------------------------------------------------

/// Response body of `PATCH /recipes/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptionResponse {
    pub message: String,
    pub recipe: Recipe,
    /// Distinct favoriting users a delivery was attempted for --
    /// attempted, not necessarily delivered.
    pub notifications_sent: usize,
}

/// PATCH /api/v1/recipes/{id}
///
/// Two explicit phases. Phase one is transactional: validate, then
/// atomically set the description, bump `update_count`, and append a
/// version snapshot; any failure here aborts with no partial state.
/// Phase two is best-effort: resolve favoriters' endpoints and fan the
/// notification out. Nothing in phase two alters the committed
/// mutation or its success response.
pub async fn update_description(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDescription>,
) -> AppResult<Json<UpdateDescriptionResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let (recipe, version) =
        RecipeRepo::update_description(&state.pool, id, &input.description, &input.user_name)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Recipe",
                id,
            }))?;

    tracing::info!(
        recipe_id = id,
        version_id = version.id,
        editor = %input.user_name,
        caller = auth.user_id,
        "Recipe description updated"
    );

    // One-way hand-off: the mutation is committed, dispatch outcomes
    // only influence the notified count.
    let notifications_sent = match resolve_targets(&state.pool, id).await {
        Ok(targets) if targets.is_empty() => 0,
        Ok(targets) => {
            let note = UpdateNotification::recipe_update(id, &recipe.title, &input.user_name);
            state
                .dispatcher
                .dispatch(&state.pool, &note, &targets)
                .await
                .users_notified
        }
        Err(err) => {
            tracing::error!(recipe_id = id, error = %err, "Failed to resolve notification targets");
            0
        }
    };

    Ok(Json(UpdateDescriptionResponse {
        message: "Recipe updated".to_string(),
        recipe,
        notifications_sent,
    }))
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// POST /api/v1/recipes/{id}/favorite
///
/// Register the caller's interest in update notifications for this
/// recipe. Favoriting twice violates the unique constraint and maps
/// to 409.
pub async fn favorite_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if RecipeRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }));
    }

    let favorite_id = FavoriteRepo::create(&state.pool, auth.user_id, id).await?;

    tracing::info!(
        favorite_id,
        recipe_id = id,
        user_id = auth.user_id,
        "Recipe favorited"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": favorite_id })),
    ))
}
