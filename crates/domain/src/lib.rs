extern crate self as gauniv_domain;

pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use entities::{FriendEdge, FriendStatus, UserAccount};
pub use error::DomainError;
pub use events::{PresenceEvent, PresenceKind};
pub use ids::{ConnectionId, UserId};
pub use value_objects::UserName;
