//! Friendship use cases.
//!
//! Translate friend intents (request, accept, remove) into single-row edge
//! mutations and answer "list my relations" with live presence badges.

use std::sync::Arc;

mod accept_friend;
mod error;
mod list_relations;
mod remove_relation;
mod request_friend;

pub use accept_friend::AcceptFriend;
pub use error::FriendError;
pub use list_relations::ListRelations;
pub use remove_relation::RemoveRelation;
pub use request_friend::RequestFriend;

/// Container for friendship use cases.
pub struct FriendUseCases {
    pub list: Arc<ListRelations>,
    pub request: Arc<RequestFriend>,
    pub accept: Arc<AcceptFriend>,
    pub remove: Arc<RemoveRelation>,
}

impl FriendUseCases {
    pub fn new(
        list: Arc<ListRelations>,
        request: Arc<RequestFriend>,
        accept: Arc<AcceptFriend>,
        remove: Arc<RemoveRelation>,
    ) -> Self {
        Self {
            list,
            request,
            accept,
            remove,
        }
    }
}
