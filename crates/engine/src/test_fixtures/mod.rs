//! Common test helpers and hand-written fakes.
//!
//! `mockall` mocks cover single-call expectations; these fakes hold state so a
//! test can drive several use cases against the same friend graph.

pub mod friend_graph;
pub mod push_mocks;

pub use friend_graph::InMemoryFriendGraph;
pub use push_mocks::RecordingPush;

use gauniv_domain::UserId;

/// Build a user id, panicking on invalid input.
pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}
