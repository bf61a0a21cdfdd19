//! Gauniv Protocol - Shared types for the storefront server and its clients
//!
//! - Wire-format DTOs for the friends REST endpoints
//! - WebSocket message types (ClientMessage, ServerMessage) for the presence hub
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and chrono
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs in DTOs** - identities travel as plain strings

pub mod dto;
pub mod messages;

pub use dto::{OnlineUsersDto, PresenceDto, RelationDto};
pub use messages::{ClientMessage, ServerMessage};
