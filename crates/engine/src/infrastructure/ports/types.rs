//! Helper types for port operations.

use gauniv_domain::{FriendEdge, UserName};

/// A friend edge joined with the display name of the party that is not the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRecord {
    pub edge: FriendEdge,
    pub other_user_name: UserName,
}
