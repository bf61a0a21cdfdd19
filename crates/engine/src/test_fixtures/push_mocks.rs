//! Recording transport for fanout tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use gauniv_domain::{ConnectionId, PresenceEvent};

use crate::infrastructure::ports::{ConnectionPushPort, PushError};

/// Records every successful push; connections marked as broken fail.
#[derive(Default)]
pub struct RecordingPush {
    pushed: Mutex<Vec<(ConnectionId, PresenceEvent)>>,
    broken: Mutex<HashSet<ConnectionId>>,
}

impl RecordingPush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn break_connection(&self, connection: ConnectionId) {
        self.broken.lock().unwrap().insert(connection);
    }

    pub fn pushed(&self) -> Vec<(ConnectionId, PresenceEvent)> {
        self.pushed.lock().unwrap().clone()
    }

    /// Connections that received at least one event.
    pub fn recipients(&self) -> HashSet<ConnectionId> {
        self.pushed().into_iter().map(|(c, _)| c).collect()
    }

    pub fn events_for(&self, connection: ConnectionId) -> Vec<PresenceEvent> {
        self.pushed()
            .into_iter()
            .filter(|(c, _)| *c == connection)
            .map(|(_, e)| e)
            .collect()
    }

    pub fn clear(&self) {
        self.pushed.lock().unwrap().clear();
    }
}

#[async_trait]
impl ConnectionPushPort for RecordingPush {
    async fn push(
        &self,
        connection: ConnectionId,
        event: &PresenceEvent,
    ) -> Result<(), PushError> {
        if self.broken.lock().unwrap().contains(&connection) {
            return Err(PushError::ConnectionGone);
        }
        self.pushed.lock().unwrap().push((connection, event.clone()));
        Ok(())
    }
}
