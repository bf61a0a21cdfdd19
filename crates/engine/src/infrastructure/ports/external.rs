//! External service ports.

use async_trait::async_trait;
use gauniv_domain::{ConnectionId, PresenceEvent};

use super::error::PushError;

/// Delivery of presence events to one live connection.
///
/// Implementations must not block on a slow peer: a push either lands in the
/// connection's outbound buffer or fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionPushPort: Send + Sync {
    async fn push(&self, connection: ConnectionId, event: &PresenceEvent)
        -> Result<(), PushError>;
}
