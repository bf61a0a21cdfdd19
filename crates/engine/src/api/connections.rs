//! Outbound channels for live WebSocket connections.
//!
//! Each socket owns a bounded queue drained by its writer task. Pushes use
//! `try_send`, so a slow or stalled peer drops events instead of holding up a
//! fanout to everyone else.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;

use gauniv_domain::{ConnectionId, PresenceEvent};
use gauniv_shared::messages::ServerMessage;

use crate::infrastructure::ports::{ConnectionPushPort, PushError};

/// Manages the outbound side of every live socket.
#[derive(Default)]
pub struct ConnectionManager {
    senders: DashMap<ConnectionId, mpsc::Sender<ServerMessage>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing messages for `connection_id` into `sender`.
    ///
    /// Returns `false` and leaves the existing channel in place when the id is
    /// already attached.
    #[must_use]
    pub fn attach(&self, connection_id: ConnectionId, sender: mpsc::Sender<ServerMessage>) -> bool {
        match self.senders.entry(connection_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(sender);
                tracing::debug!(connection_id = %connection_id, "Connection attached");
                true
            }
        }
    }

    pub fn detach(&self, connection_id: ConnectionId) {
        if self.senders.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection detached");
        }
    }

    /// Queue a message without waiting for room in the channel.
    pub fn send(&self, connection_id: ConnectionId, message: ServerMessage) -> Result<(), PushError> {
        // Clone the sender so the shard lock is released before sending
        let sender = self
            .senders
            .get(&connection_id)
            .map(|entry| entry.value().clone())
            .ok_or(PushError::ConnectionGone)?;

        sender.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PushError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => PushError::ConnectionGone,
        })
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

#[async_trait]
impl ConnectionPushPort for ConnectionManager {
    async fn push(&self, connection: ConnectionId, event: &PresenceEvent) -> Result<(), PushError> {
        self.send(connection, ServerMessage::from(event))
    }
}
