//! Handlers for push endpoint registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use forkful_db::models::push_endpoint::RegisterEndpoint;
use forkful_db::repositories::PushEndpointRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/push/subscriptions
///
/// Register an opaque push endpoint (delivery address + keys) for the
/// authenticated caller. A user may register several devices.
pub async fn register_endpoint(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RegisterEndpoint>,
) -> AppResult<impl IntoResponse> {
    let endpoint_id = PushEndpointRepo::register(&state.pool, auth.user_id, &input.payload).await?;

    tracing::info!(
        endpoint_id,
        user_id = auth.user_id,
        "Push endpoint registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": endpoint_id })),
    ))
}
