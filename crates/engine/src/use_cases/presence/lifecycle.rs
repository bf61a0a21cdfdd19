//! Connection lifecycle: `Connecting -> Connected -> Disconnected`.
//!
//! A connection becomes `Connected` when it is registered and `Disconnected`
//! when it is unregistered; the registry holds the state. Each transition
//! updates the registry first and only then runs the friend fanout, outside
//! the registry lock.

use std::str::FromStr;
use std::sync::Arc;

use gauniv_domain::{ConnectionId, PresenceKind, UserId};

use crate::infrastructure::ports::RepoError;
use crate::stores::{PresenceError, PresenceRegistry};

use super::notify_friends::NotifyFriends;

/// When a connect/disconnect is worth telling friends about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresenceNotifyPolicy {
    /// Only when the user's online state flips: first connection opened, last
    /// connection closed. Closing one of two tabs stays silent.
    #[default]
    OnTransition,
    /// On every connect and every disconnect, whatever else the user has open.
    EveryConnection,
}

impl PresenceNotifyPolicy {
    fn should_notify(self, transitioned: bool) -> bool {
        match self {
            PresenceNotifyPolicy::OnTransition => transitioned,
            PresenceNotifyPolicy::EveryConnection => true,
        }
    }
}

impl FromStr for PresenceNotifyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transition" | "on_transition" => Ok(Self::OnTransition),
            "every_connection" | "every" => Ok(Self::EveryConnection),
            other => Err(format!("Unknown presence notify policy: {other}")),
        }
    }
}

/// Why a connection closed. Logged only, never changes handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    ClientClosed,
    TransportError,
    ServerShutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The connection attempt must be aborted.
    #[error(transparent)]
    Presence(#[from] PresenceError),
    /// Presence was updated but friends could not be looked up.
    #[error("Friend notification failed: {0}")]
    Notify(#[source] RepoError),
}

impl LifecycleError {
    /// Whether the connection has to be torn down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LifecycleError::Presence(_))
    }
}

pub struct ConnectionLifecycle {
    registry: Arc<PresenceRegistry>,
    notify: Arc<NotifyFriends>,
    policy: PresenceNotifyPolicy,
}

impl ConnectionLifecycle {
    pub fn new(
        registry: Arc<PresenceRegistry>,
        notify: Arc<NotifyFriends>,
        policy: PresenceNotifyPolicy,
    ) -> Self {
        Self {
            registry,
            notify,
            policy,
        }
    }

    /// A session for `user_id` was established on `connection`.
    pub async fn on_opened(
        &self,
        connection: ConnectionId,
        user_id: UserId,
    ) -> Result<(), LifecycleError> {
        let registration = match self.registry.register(connection, user_id.clone()).await {
            Ok(registration) => registration,
            Err(e) => {
                tracing::error!(
                    connection_id = %connection,
                    user_id = %user_id,
                    error = %e,
                    "Rejecting connection, presence registry already holds it"
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            connection_id = %connection,
            user_id = %user_id,
            came_online = registration.came_online,
            "Connection registered"
        );

        if self.policy.should_notify(registration.came_online) {
            self.notify
                .execute(&user_id, PresenceKind::Online)
                .await
                .map_err(LifecycleError::Notify)?;
        }
        Ok(())
    }

    /// `connection` ended. Unknown or already closed connections are ignored.
    pub async fn on_closed(
        &self,
        connection: ConnectionId,
        reason: CloseReason,
    ) -> Result<(), LifecycleError> {
        let Some(departure) = self.registry.unregister(connection).await else {
            tracing::debug!(
                connection_id = %connection,
                reason = ?reason,
                "Close for unregistered connection ignored"
            );
            return Ok(());
        };

        tracing::info!(
            connection_id = %connection,
            user_id = %departure.user_id,
            went_offline = departure.went_offline,
            reason = ?reason,
            "Connection unregistered"
        );

        if self.policy.should_notify(departure.went_offline) {
            self.notify
                .execute(&departure.user_id, PresenceKind::Offline)
                .await
                .map_err(LifecycleError::Notify)?;
        }
        Ok(())
    }
}
