//! Gauniv Engine library.
//!
//! Server side of the storefront's friends page and live presence badges.
//!
//! ## Structure
//!
//! - `stores/` - In-memory presence registry
//! - `use_cases/` - Friendship operations, connection lifecycle and fanout
//! - `infrastructure/` - Ports, the SQLite adapter, clock and configuration
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end tests over a real socket and a temporary SQLite file.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
