//! Accept an inbound friend request.

use std::sync::Arc;

use gauniv_domain::{FriendEdge, UserId};

use crate::infrastructure::ports::{ClockPort, FriendRepo};

use super::FriendError;

pub struct AcceptFriend {
    friends: Arc<dyn FriendRepo>,
    clock: Arc<dyn ClockPort>,
}

impl AcceptFriend {
    pub fn new(friends: Arc<dyn FriendRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { friends, clock }
    }

    /// Accept the edge `requester -> viewer`. The viewer's own outbound
    /// request is never matched. Accepting twice returns the edge unchanged.
    pub async fn execute(
        &self,
        viewer: &UserId,
        requester: &UserId,
    ) -> Result<FriendEdge, FriendError> {
        let mut edge = self
            .friends
            .find_directed(requester, viewer)
            .await?
            .ok_or(FriendError::RequestNotFound)?;

        if edge.is_accepted() {
            return Ok(edge);
        }

        edge.accept(self.clock.now())?;
        self.friends.update(&edge).await?;

        tracing::info!(
            requester = %requester,
            viewer = %viewer,
            "Friend request accepted"
        );
        Ok(edge)
    }
}
