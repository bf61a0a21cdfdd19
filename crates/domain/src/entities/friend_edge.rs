//! Friend edge entity
//!
//! A directed record between two accounts. While pending it reads as a request
//! from `source` to `target`; once accepted both sides are peers and the
//! direction is only kept for audit.
//!
//! At most one edge exists per unordered pair of users. That invariant spans
//! rows, so it is enforced by the store and the request use case, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::UserId;

/// Relation status as observed by one of the two parties.
///
/// Derived from the edge on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FriendStatus {
    /// Mutual friendship
    Accepted,
    /// The viewer sent a request that is still pending
    Sent,
    /// The viewer received a request that is still pending
    Received,
}

impl FriendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendStatus::Accepted => "Accepted",
            FriendStatus::Sent => "Sent",
            FriendStatus::Received => "Received",
        }
    }
}

impl std::fmt::Display for FriendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendEdge {
    source: UserId,
    target: UserId,
    accepted: bool,
    created_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
}

impl FriendEdge {
    /// Create a pending request from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when both ids are the same account.
    pub fn request(source: UserId, target: UserId, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if source == target {
            return Err(DomainError::validation("Cannot add yourself"));
        }
        Ok(Self {
            source,
            target,
            accepted: false,
            created_at: now,
            accepted_at: None,
        })
    }

    /// Rebuild an edge from a stored row.
    pub fn from_storage(
        source: UserId,
        target: UserId,
        accepted: bool,
        created_at: DateTime<Utc>,
        accepted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            source,
            target,
            accepted,
            created_at,
            accepted_at,
        }
    }

    /// Turn the pending request into a friendship.
    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.accepted {
            return Err(DomainError::invalid_transition(
                "Friend request already accepted",
            ));
        }
        self.accepted = true;
        self.accepted_at = Some(now);
        Ok(())
    }

    pub fn source(&self) -> &UserId {
        &self.source
    }

    pub fn target(&self) -> &UserId {
        &self.target
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Status as seen by `viewer`, or `None` if the viewer is not a party.
    pub fn status_for(&self, viewer: &UserId) -> Option<FriendStatus> {
        if self.accepted && (self.source == *viewer || self.target == *viewer) {
            Some(FriendStatus::Accepted)
        } else if self.source == *viewer {
            Some(FriendStatus::Sent)
        } else if self.target == *viewer {
            Some(FriendStatus::Received)
        } else {
            None
        }
    }

    /// The party that is not `viewer`.
    pub fn other_party(&self, viewer: &UserId) -> Option<&UserId> {
        if self.source == *viewer {
            Some(&self.target)
        } else if self.target == *viewer {
            Some(&self.source)
        } else {
            None
        }
    }

    /// True if this edge links `a` and `b`, in either direction.
    pub fn connects(&self, a: &UserId, b: &UserId) -> bool {
        (self.source == *a && self.target == *b) || (self.source == *b && self.target == *a)
    }
}
