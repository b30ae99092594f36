//! Forkful push-notification subsystem.
//!
//! Building blocks for the recipe-update fan-out:
//!
//! - [`UpdateNotification`] — the structured payload delivered to
//!   client devices.
//! - [`transport`] — the delivery seam ([`PushTransport`]) and its
//!   reqwest-backed production implementation.
//! - [`targets`] — the interested-party resolver (favoriters joined
//!   with their registered endpoints).
//! - [`Dispatcher`] — per-endpoint concurrent delivery with tagged
//!   outcome classification and registry self-healing.

pub mod dispatch;
pub mod payload;
pub mod targets;
pub mod transport;

pub use dispatch::{DeliveryOutcome, DispatchReport, Dispatcher, EndpointRegistry};
pub use payload::UpdateNotification;
pub use targets::resolve_targets;
pub use transport::{HttpPush, PushError, PushTransport};
