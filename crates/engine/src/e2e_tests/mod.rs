//! End-to-end tests for the presence hub and friends API.
//!
//! Each test starts the real router on an ephemeral port over a temporary
//! SQLite file and talks to it with `tokio-tungstenite` clients.
//!
//! ```bash
//! cargo test -p gauniv-engine --lib e2e_tests
//! ```

mod harness;

pub use harness::*;
