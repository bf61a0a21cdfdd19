//! Domain entities

mod friend_edge;
mod user;

pub use friend_edge::{FriendEdge, FriendStatus};
pub use user::UserAccount;
