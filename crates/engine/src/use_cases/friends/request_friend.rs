//! Send a friend request by username.

use std::sync::Arc;

use gauniv_domain::{FriendEdge, UserId};

use crate::infrastructure::ports::{ClockPort, FriendRepo, UserRepo};

use super::FriendError;

pub struct RequestFriend {
    users: Arc<dyn UserRepo>,
    friends: Arc<dyn FriendRepo>,
    clock: Arc<dyn ClockPort>,
}

impl RequestFriend {
    pub fn new(
        users: Arc<dyn UserRepo>,
        friends: Arc<dyn FriendRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            users,
            friends,
            clock,
        }
    }

    /// Create a pending edge `source -> target`.
    ///
    /// At most one edge exists per unordered pair, so an existing edge in
    /// either direction blocks the request. Both parties must have an account.
    pub async fn execute(
        &self,
        source: &UserId,
        target_user_name: &str,
    ) -> Result<FriendEdge, FriendError> {
        if self.users.get(source).await?.is_none() {
            return Err(FriendError::UserNotFound(source.to_string()));
        }

        let target = self
            .users
            .find_by_username(target_user_name)
            .await?
            .ok_or_else(|| FriendError::UserNotFound(target_user_name.to_string()))?;
        let target_id = target.id().clone();

        if target_id == *source {
            return Err(FriendError::SelfFriendRequest);
        }

        if let Some(existing) = self.friends.find_between(source, &target_id).await? {
            return Err(if existing.is_accepted() {
                FriendError::AlreadyFriends
            } else {
                FriendError::RequestPending
            });
        }

        let edge = FriendEdge::request(source.clone(), target_id, self.clock.now())?;
        match self.friends.insert(&edge).await {
            Ok(()) => {}
            // Lost a race with a concurrent request for the same pair
            Err(e) if e.is_constraint_violation() => return Err(FriendError::RequestPending),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            source = %edge.source(),
            target = %edge.target(),
            "Friend request created"
        );
        Ok(edge)
    }
}
