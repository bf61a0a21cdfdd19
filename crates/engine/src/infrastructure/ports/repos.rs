//! Repository port traits for the relational store.
//!
//! Each method maps to one read or one single-row write. The store is trusted
//! to make those atomic; nothing here opens transactions.

use async_trait::async_trait;
use gauniv_domain::{FriendEdge, UserAccount, UserId};

use super::error::RepoError;
use super::types::RelationRecord;

// =============================================================================
// Friend edges
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendRepo: Send + Sync {
    /// Every edge touching `user_id`, pending or accepted, with the other party's name.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RelationRecord>, RepoError>;

    /// Ids of the users with an accepted edge to `user_id`, in either direction.
    async fn accepted_friend_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, RepoError>;

    /// The edge between `a` and `b` in either direction.
    async fn find_between(&self, a: &UserId, b: &UserId)
        -> Result<Option<FriendEdge>, RepoError>;

    /// The edge `source -> target` only.
    async fn find_directed(
        &self,
        source: &UserId,
        target: &UserId,
    ) -> Result<Option<FriendEdge>, RepoError>;

    /// Fails with `RepoError::ConstraintViolation` if the pair already has an edge.
    async fn insert(&self, edge: &FriendEdge) -> Result<(), RepoError>;

    async fn update(&self, edge: &FriendEdge) -> Result<(), RepoError>;

    /// Returns whether an edge was deleted.
    async fn delete_between(&self, a: &UserId, b: &UserId) -> Result<bool, RepoError>;
}

// =============================================================================
// Accounts
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>, RepoError>;
    async fn find_by_username(&self, user_name: &str) -> Result<Option<UserAccount>, RepoError>;
    async fn save(&self, account: &UserAccount) -> Result<(), RepoError>;
}
