//! Per-endpoint notification fan-out.
//!
//! [`Dispatcher::dispatch`] runs one delivery attempt per endpoint
//! concurrently and waits for every attempt to settle — a collect-all
//! join, never fail-fast. Each attempt resolves to an explicit
//! [`DeliveryOutcome`]; a permanent failure additionally prunes the
//! endpoint from the registry. Nothing here escalates to the caller:
//! the aggregate result is a count report only.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use forkful_core::types::DbId;
use forkful_db::models::push_endpoint::PushEndpoint;
use forkful_db::repositories::PushEndpointRepo;
use forkful_db::DbPool;
use futures::future::join_all;

use crate::payload::UpdateNotification;
use crate::transport::PushTransport;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// The settled result of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The transport accepted the notification.
    Delivered,
    /// Delivery failed for a reason that does not indicate endpoint
    /// death; logged, never retried within this call.
    TransientFailure,
    /// The endpoint no longer exists; its registry record was pruned.
    Gone,
}

/// Aggregate counts for one fan-out invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Endpoints a delivery was attempted for.
    pub attempted: usize,
    /// Attempts the transport accepted.
    pub delivered: usize,
    /// Endpoints removed from the registry as permanently gone.
    pub pruned: usize,
    /// Distinct users among the targeted endpoints. This is the
    /// `notificationsSent` figure the mutation response reports,
    /// independent of per-endpoint delivery outcome.
    pub users_notified: usize,
}

// ---------------------------------------------------------------------------
// Registry seam
// ---------------------------------------------------------------------------

/// The mutable side of the endpoint registry the dispatcher self-heals.
#[async_trait]
pub trait EndpointRegistry: Send + Sync {
    /// Remove a permanently-dead endpoint. Returns `true` when a
    /// record was deleted.
    async fn remove(&self, endpoint_id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl EndpointRegistry for DbPool {
    async fn remove(&self, endpoint_id: DbId) -> Result<bool, sqlx::Error> {
        PushEndpointRepo::delete(self, endpoint_id).await
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Delivers one notification per endpoint, isolating per-endpoint
/// failure and pruning permanently-dead endpoints.
pub struct Dispatcher {
    transport: Arc<dyn PushTransport>,
}

impl Dispatcher {
    /// Create a dispatcher over the given transport.
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self { transport }
    }

    /// Fan a notification out to every target endpoint.
    ///
    /// All attempts run concurrently; the call returns only after each
    /// one has settled. An empty target set returns a zero report
    /// without touching the transport.
    pub async fn dispatch(
        &self,
        registry: &dyn EndpointRegistry,
        notification: &UpdateNotification,
        targets: &[PushEndpoint],
    ) -> DispatchReport {
        if targets.is_empty() {
            return DispatchReport::default();
        }

        let payload = serde_json::to_value(notification).unwrap_or_default();
        let users: HashSet<DbId> = targets.iter().map(|e| e.user_id).collect();

        let attempts = targets
            .iter()
            .map(|endpoint| self.attempt(registry, endpoint, &payload));
        let outcomes = join_all(attempts).await;

        let delivered = outcomes
            .iter()
            .filter(|o| **o == DeliveryOutcome::Delivered)
            .count();
        let pruned = outcomes
            .iter()
            .filter(|o| **o == DeliveryOutcome::Gone)
            .count();

        let report = DispatchReport {
            attempted: targets.len(),
            delivered,
            pruned,
            users_notified: users.len(),
        };

        tracing::info!(
            recipe_id = notification.recipe_id,
            attempted = report.attempted,
            delivered = report.delivered,
            pruned = report.pruned,
            users = report.users_notified,
            "Update fan-out settled"
        );

        report
    }

    /// One isolated delivery attempt; never propagates an error.
    async fn attempt(
        &self,
        registry: &dyn EndpointRegistry,
        endpoint: &PushEndpoint,
        payload: &serde_json::Value,
    ) -> DeliveryOutcome {
        match self.transport.send(&endpoint.payload, payload).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(err) if err.is_gone() => {
                match registry.remove(endpoint.id).await {
                    Ok(_) => tracing::info!(
                        endpoint_id = endpoint.id,
                        user_id = endpoint.user_id,
                        "Pruned permanently-dead push endpoint"
                    ),
                    Err(db_err) => tracing::error!(
                        endpoint_id = endpoint.id,
                        error = %db_err,
                        "Failed to prune dead push endpoint"
                    ),
                }
                DeliveryOutcome::Gone
            }
            Err(err) => {
                tracing::warn!(
                    endpoint_id = endpoint.id,
                    user_id = endpoint.user_id,
                    error = %err,
                    "Transient push delivery failure"
                );
                DeliveryOutcome::TransientFailure
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::transport::PushError;

    /// Transport whose behaviour is scripted through the endpoint
    /// payload: `{"fail": "gone"}` and `{"fail": "transient"}` trigger
    /// the matching failure, anything else is delivered.
    #[derive(Default)]
    struct ScriptedTransport {
        sent: Mutex<Vec<serde_json::Value>>,
    }

    #[async_trait]
    impl PushTransport for ScriptedTransport {
        async fn send(
            &self,
            endpoint: &serde_json::Value,
            _payload: &serde_json::Value,
        ) -> Result<(), PushError> {
            self.sent.lock().unwrap().push(endpoint.clone());
            match endpoint.get("fail").and_then(|v| v.as_str()) {
                Some("gone") => Err(PushError::Status(410)),
                Some("transient") => Err(PushError::Status(500)),
                _ => Ok(()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingRegistry {
        removed: Mutex<Vec<DbId>>,
    }

    #[async_trait]
    impl EndpointRegistry for RecordingRegistry {
        async fn remove(&self, endpoint_id: DbId) -> Result<bool, sqlx::Error> {
            self.removed.lock().unwrap().push(endpoint_id);
            Ok(true)
        }
    }

    fn endpoint(id: DbId, user_id: DbId, payload: serde_json::Value) -> PushEndpoint {
        PushEndpoint {
            id,
            user_id,
            payload,
            created_at: chrono::Utc::now(),
        }
    }

    fn note() -> UpdateNotification {
        UpdateNotification::recipe_update(1, "Carbonara", "alice")
    }

    fn dispatcher(transport: Arc<ScriptedTransport>) -> Dispatcher {
        Dispatcher::new(transport)
    }

    #[tokio::test]
    async fn zero_targets_never_touch_the_transport() {
        let transport = Arc::new(ScriptedTransport::default());
        let registry = RecordingRegistry::default();

        let report = dispatcher(Arc::clone(&transport))
            .dispatch(&registry, &note(), &[])
            .await;

        assert_eq!(report, DispatchReport::default());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn gone_failure_prunes_exactly_that_endpoint() {
        let transport = Arc::new(ScriptedTransport::default());
        let registry = RecordingRegistry::default();
        let targets = vec![
            endpoint(10, 1, serde_json::json!({ "fail": "gone" })),
            endpoint(11, 1, serde_json::json!({})),
        ];

        let report = dispatcher(Arc::clone(&transport))
            .dispatch(&registry, &note(), &targets)
            .await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.pruned, 1);
        assert_eq!(*registry.removed.lock().unwrap(), vec![10]);
    }

    #[tokio::test]
    async fn transient_failure_leaves_the_registry_untouched() {
        let transport = Arc::new(ScriptedTransport::default());
        let registry = RecordingRegistry::default();
        let targets = vec![endpoint(10, 1, serde_json::json!({ "fail": "transient" }))];

        let report = dispatcher(Arc::clone(&transport))
            .dispatch(&registry, &note(), &targets)
            .await;

        assert_eq!(report.attempted, 1);
        assert_eq!(report.delivered, 0);
        assert_eq!(report.pruned, 0);
        assert!(registry.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_endpoint_failure_never_blocks_the_others() {
        let transport = Arc::new(ScriptedTransport::default());
        let registry = RecordingRegistry::default();
        let targets = vec![
            endpoint(1, 1, serde_json::json!({ "fail": "transient" })),
            endpoint(2, 2, serde_json::json!({})),
            endpoint(3, 3, serde_json::json!({ "fail": "gone" })),
            endpoint(4, 4, serde_json::json!({})),
        ];

        let report = dispatcher(Arc::clone(&transport))
            .dispatch(&registry, &note(), &targets)
            .await;

        assert_eq!(report.attempted, 4);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.pruned, 1);
        assert_eq!(transport.sent.lock().unwrap().len(), 4);
    }

    /// Favoriters {U1, U2}; U1 has one live and one gone endpoint, U2
    /// has none. Two attempts, one pruned, one user notified.
    #[tokio::test]
    async fn report_counts_distinct_users_not_endpoints() {
        let transport = Arc::new(ScriptedTransport::default());
        let registry = RecordingRegistry::default();
        let targets = vec![
            endpoint(20, 1, serde_json::json!({})),
            endpoint(21, 1, serde_json::json!({ "fail": "gone" })),
        ];

        let report = dispatcher(Arc::clone(&transport))
            .dispatch(&registry, &note(), &targets)
            .await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.pruned, 1);
        assert_eq!(*registry.removed.lock().unwrap(), vec![21]);
        assert_eq!(report.users_notified, 1);
    }
}
