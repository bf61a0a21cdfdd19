//! Friendship use case errors.

use gauniv_domain::DomainError;

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum FriendError {
    #[error("Cannot add yourself")]
    SelfFriendRequest,
    #[error("Already friends")]
    AlreadyFriends,
    #[error("Request already pending")]
    RequestPending,
    #[error("Request not found")]
    RequestNotFound,
    #[error("User not found")]
    UserNotFound(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl FriendError {
    /// Errors caused by the caller's input, as opposed to store failures.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, FriendError::Repo(_))
    }
}
