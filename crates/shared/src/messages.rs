//! WebSocket message types for the presence hub
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change: `FriendOnline` and `FriendOffline`
//!   are the event names clients subscribe to
//! - Unknown client message types deserialize to `Unknown`

use gauniv_domain::{PresenceEvent, PresenceKind};
use serde::{Deserialize, Serialize};

// =============================================================================
// Client Messages (client → server)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Application-level keepalive
    Ping,
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Server Messages (server → client)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// An accepted friend now has a live connection
    FriendOnline { user_id: String },
    /// An accepted friend dropped a connection (or their last one)
    FriendOffline { user_id: String },
    /// Reply to `ClientMessage::Ping`
    Pong,
    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&PresenceEvent> for ServerMessage {
    fn from(event: &PresenceEvent) -> Self {
        let user_id = event.subject.to_string();
        match event.kind {
            PresenceKind::Online => ServerMessage::FriendOnline { user_id },
            PresenceKind::Offline => ServerMessage::FriendOffline { user_id },
        }
    }
}
