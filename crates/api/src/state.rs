use std::sync::Arc;

use forkful_core::cache::TtlCache;
use forkful_db::models::recipe::RecipePage;
use forkful_push::Dispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: forkful_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Push-notification dispatcher for the update fan-out.
    pub dispatcher: Arc<Dispatcher>,
    /// Memoized recipe query pages, keyed by canonical query serialization.
    pub recipe_cache: Arc<TtlCache<RecipePage>>,
    /// Memoized whole-collection label lookups (categories/tags/ingredients).
    pub facet_cache: Arc<TtlCache<Vec<String>>>,
}
