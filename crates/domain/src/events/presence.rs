//! Presence transition events pushed to friends' connections.

use serde::{Deserialize, Serialize};

use crate::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresenceKind {
    Online,
    Offline,
}

impl PresenceKind {
    /// Event name seen by clients.
    pub fn event_name(&self) -> &'static str {
        match self {
            PresenceKind::Online => "FriendOnline",
            PresenceKind::Offline => "FriendOffline",
        }
    }
}

/// Ephemeral `(kind, subject)` message. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub kind: PresenceKind,
    pub subject: UserId,
}

impl PresenceEvent {
    pub fn new(kind: PresenceKind, subject: UserId) -> Self {
        Self { kind, subject }
    }

    pub fn online(subject: UserId) -> Self {
        Self::new(PresenceKind::Online, subject)
    }

    pub fn offline(subject: UserId) -> Self {
        Self::new(PresenceKind::Offline, subject)
    }
}
