//! SQLite persistence adapters
//!
//! The relational store holding accounts and friend edges. Only the tables the
//! friendship subsystem reads are created here.

mod sqlite_friend_store;

pub use sqlite_friend_store::SqliteFriendStore;
