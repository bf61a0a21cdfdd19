//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The relational store holding accounts and friend edges (could swap SQLite -> Postgres)
//! - The realtime transport that carries presence events to clients
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{FriendRepo, UserRepo};

pub use types::RelationRecord;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::ConnectionPushPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockFriendRepo, MockUserRepo};

#[cfg(test)]
pub use external::MockConnectionPushPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{PushError, RepoError};
