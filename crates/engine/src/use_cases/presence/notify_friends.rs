//! Friend notification fanout.
//!
//! Pushes one presence event about a subject to every live connection of the
//! subject's accepted friends. Delivery is best-effort and at-most-once: a
//! failed push is counted and dropped, offline friends get nothing.

use std::sync::Arc;

use futures_util::future::join_all;
use gauniv_domain::{PresenceEvent, PresenceKind, UserId};

use crate::infrastructure::ports::{ConnectionPushPort, FriendRepo, RepoError};
use crate::stores::PresenceRegistry;

/// What a fanout did, for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    /// Live connections selected to receive the event
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct NotifyFriends {
    friends: Arc<dyn FriendRepo>,
    registry: Arc<PresenceRegistry>,
    push: Arc<dyn ConnectionPushPort>,
}

impl NotifyFriends {
    pub fn new(
        friends: Arc<dyn FriendRepo>,
        registry: Arc<PresenceRegistry>,
        push: Arc<dyn ConnectionPushPort>,
    ) -> Self {
        Self {
            friends,
            registry,
            push,
        }
    }

    /// Notify the accepted friends of `subject` that it went online or offline.
    ///
    /// # Errors
    ///
    /// Only a failing friend lookup is an error. Push failures are swallowed.
    pub async fn execute(
        &self,
        subject: &UserId,
        kind: PresenceKind,
    ) -> Result<FanoutReport, RepoError> {
        let friend_ids = self.friends.accepted_friend_ids(subject).await?;
        if friend_ids.is_empty() {
            return Ok(FanoutReport::default());
        }

        let recipients = self.registry.connections_for_users(&friend_ids).await;
        if recipients.is_empty() {
            tracing::debug!(
                user_id = %subject,
                event = kind.event_name(),
                friends = friend_ids.len(),
                "No friend online, nothing to push"
            );
            return Ok(FanoutReport::default());
        }

        let event = PresenceEvent::new(kind, subject.clone());
        let results = join_all(recipients.iter().map(|&connection| {
            let event = &event;
            async move { (connection, self.push.push(connection, event).await) }
        }))
        .await;

        let mut report = FanoutReport {
            recipients: recipients.len(),
            ..FanoutReport::default()
        };
        for (connection, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::debug!(
                        connection_id = %connection,
                        user_id = %subject,
                        error = %e,
                        "Dropped presence event"
                    );
                }
            }
        }

        tracing::debug!(
            user_id = %subject,
            event = kind.event_name(),
            recipients = report.recipients,
            delivered = report.delivered,
            "Presence fanout complete"
        );
        Ok(report)
    }
}
