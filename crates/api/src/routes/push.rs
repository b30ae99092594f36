//! Route definitions for the `/push` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::push;
use crate::state::AppState;

/// Routes mounted at `/push`.
pub fn router() -> Router<AppState> {
    Router::new().route("/subscriptions", post(push::register_endpoint))
}
