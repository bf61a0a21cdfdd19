//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the database:
//! - `PresenceRegistry` - which users have live realtime connections

pub mod presence;

pub use presence::{Departure, PresenceError, PresenceRegistry, Registration};
