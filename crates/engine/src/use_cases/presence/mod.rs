//! Presence use cases: connection lifecycle and friend notification fanout.

mod lifecycle;
mod notify_friends;

use std::sync::Arc;

pub use lifecycle::{CloseReason, ConnectionLifecycle, LifecycleError, PresenceNotifyPolicy};
pub use notify_friends::{FanoutReport, NotifyFriends};

/// Container for presence use cases.
pub struct PresenceUseCases {
    pub notify_friends: Arc<NotifyFriends>,
    pub lifecycle: Arc<ConnectionLifecycle>,
}

impl PresenceUseCases {
    pub fn new(notify_friends: Arc<NotifyFriends>, lifecycle: Arc<ConnectionLifecycle>) -> Self {
        Self {
            notify_friends,
            lifecycle,
        }
    }
}
