//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area. Use cases orchestrate
//! the stores and ports; transport code only calls into them.

pub mod friends;
pub mod presence;

pub use friends::FriendUseCases;
pub use presence::PresenceUseCases;
