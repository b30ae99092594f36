//! Push endpoint models and DTOs.

use forkful_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `push_endpoints` table.
///
/// `payload` is an opaque blob (delivery address plus encryption keys)
/// owned by the push transport; the persistence layer never inspects it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushEndpoint {
    pub id: DbId,
    pub user_id: DbId,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// Body of `POST /push/subscriptions`.
#[derive(Debug, Deserialize)]
pub struct RegisterEndpoint {
    pub payload: serde_json::Value,
}
