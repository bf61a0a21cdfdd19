//! Domain events

mod presence;

pub use presence::{PresenceEvent, PresenceKind};
