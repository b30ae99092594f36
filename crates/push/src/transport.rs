//! Push delivery transport.
//!
//! [`PushTransport`] is the seam between the dispatcher and the actual
//! delivery mechanism. The production implementation ([`HttpPush`])
//! posts the JSON payload to the endpoint's delivery URL with a fixed
//! per-attempt timeout. There is no retry: at most one delivery
//! attempt per mutation.

use std::time::Duration;

use async_trait::async_trait;

/// HTTP request timeout for a single delivery attempt. This bounds the
/// worst-case latency per endpoint; the fan-out as a whole has no
/// aggregate timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport status codes that mean the endpoint no longer exists.
const GONE_STATUSES: [u16; 2] = [404, 410];

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The push service returned a non-2xx status code.
    #[error("Push service returned HTTP {0}")]
    Status(u16),

    /// The stored endpoint payload carries no delivery URL.
    #[error("Endpoint payload has no delivery url")]
    MissingUrl,
}

impl PushError {
    /// Whether this failure is permanent: the endpoint is gone and its
    /// registry record should be purged. A payload without a delivery
    /// URL can never succeed, so it counts as gone too.
    pub fn is_gone(&self) -> bool {
        match self {
            PushError::Status(code) => GONE_STATUSES.contains(code),
            PushError::MissingUrl => true,
            PushError::Request(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Generic push-delivery collaborator.
///
/// `endpoint` is the opaque registered payload (delivery address plus
/// encryption keys); `payload` is the JSON notification body.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(
        &self,
        endpoint: &serde_json::Value,
        payload: &serde_json::Value,
    ) -> Result<(), PushError>;
}

// ---------------------------------------------------------------------------
// HttpPush
// ---------------------------------------------------------------------------

/// Production transport: POST the payload to the endpoint URL.
pub struct HttpPush {
    client: reqwest::Client,
}

impl HttpPush {
    /// Create a transport with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }
}

#[async_trait]
impl PushTransport for HttpPush {
    async fn send(
        &self,
        endpoint: &serde_json::Value,
        payload: &serde_json::Value,
    ) -> Result<(), PushError> {
        let url = endpoint
            .get("endpoint")
            .and_then(|v| v.as_str())
            .ok_or(PushError::MissingUrl)?;

        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(PushError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

impl Default for HttpPush {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _transport = HttpPush::new();
    }

    #[test]
    fn gone_statuses_are_permanent() {
        assert!(PushError::Status(404).is_gone());
        assert!(PushError::Status(410).is_gone());
    }

    #[test]
    fn other_statuses_are_transient() {
        assert!(!PushError::Status(400).is_gone());
        assert!(!PushError::Status(429).is_gone());
        assert!(!PushError::Status(500).is_gone());
    }

    #[test]
    fn missing_url_is_permanent() {
        assert!(PushError::MissingUrl.is_gone());
    }

    #[test]
    fn request_errors_are_transient() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        assert!(!PushError::Request(req_err).is_gone());
    }

    #[test]
    fn status_error_display() {
        assert_eq!(
            PushError::Status(410).to_string(),
            "Push service returned HTTP 410"
        );
    }

    #[tokio::test]
    async fn send_without_delivery_url_fails_fast() {
        let transport = HttpPush::new();
        let endpoint = serde_json::json!({ "keys": { "auth": "zzz" } });
        let err = transport
            .send(&endpoint, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::MissingUrl));
    }
}
