//! Reject, cancel or unfriend: all delete the pair's edge.

use std::sync::Arc;

use gauniv_domain::UserId;

use crate::infrastructure::ports::FriendRepo;

use super::FriendError;

pub struct RemoveRelation {
    friends: Arc<dyn FriendRepo>,
}

impl RemoveRelation {
    pub fn new(friends: Arc<dyn FriendRepo>) -> Self {
        Self { friends }
    }

    /// Delete the edge between `viewer` and `other` whatever its direction or
    /// state. Returns whether an edge existed; a missing edge is not an error.
    pub async fn execute(&self, viewer: &UserId, other: &UserId) -> Result<bool, FriendError> {
        let removed = self.friends.delete_between(viewer, other).await?;
        tracing::info!(viewer = %viewer, other = %other, removed, "Friend relation removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockFriendRepo;
    use crate::test_fixtures::user;

    #[tokio::test]
    async fn missing_edge_is_a_no_op() {
        let mut friends = MockFriendRepo::new();
        friends
            .expect_delete_between()
            .times(1)
            .returning(|_, _| Ok(false));

        let removed = RemoveRelation::new(Arc::new(friends))
            .execute(&user("me"), &user("nobody"))
            .await
            .unwrap();

        assert!(!removed);
    }
}
