//! Presence registry.
//!
//! Bidirectional index between live connections and the users that own them.
//! Both directions live in one struct behind one lock, so a connection is in
//! the forward map if and only if it is in its user's set in the reverse map.
//!
//! No I/O happens while the lock is held; callers query stores and push to
//! peers after the registry call returns.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use gauniv_domain::{ConnectionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    #[error("Connection {0} is already registered")]
    DuplicateConnection(ConnectionId),
}

/// Outcome of a successful `register`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// The user had no live connection before this one.
    pub came_online: bool,
}

/// Outcome of unregistering a connection that was registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub user_id: UserId,
    /// That was the user's last live connection.
    pub went_offline: bool,
}

#[derive(Debug, Default)]
struct PresenceIndex {
    by_connection: HashMap<ConnectionId, UserId>,
    by_user: HashMap<UserId, HashSet<ConnectionId>>,
}

/// Process-wide presence state, constructed once and shared by `Arc`.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    index: RwLock<PresenceIndex>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `connection` belongs to `user_id`.
    pub async fn register(
        &self,
        connection: ConnectionId,
        user_id: UserId,
    ) -> Result<Registration, PresenceError> {
        let mut index = self.index.write().await;
        if index.by_connection.contains_key(&connection) {
            return Err(PresenceError::DuplicateConnection(connection));
        }

        let connections = index.by_user.entry(user_id.clone()).or_default();
        let came_online = connections.is_empty();
        connections.insert(connection);
        index.by_connection.insert(connection, user_id);

        Ok(Registration { came_online })
    }

    /// Forget `connection`. Returns `None` if it was not registered, which is
    /// expected when disconnect handlers race or fire twice.
    pub async fn unregister(&self, connection: ConnectionId) -> Option<Departure> {
        let mut index = self.index.write().await;
        let user_id = index.by_connection.remove(&connection)?;

        let went_offline = match index.by_user.get_mut(&user_id) {
            Some(connections) => {
                connections.remove(&connection);
                connections.is_empty()
            }
            None => true,
        };
        if went_offline {
            index.by_user.remove(&user_id);
        }

        Some(Departure {
            user_id,
            went_offline,
        })
    }

    /// Live connections of `user_id`; empty when offline.
    pub async fn connections_for(&self, user_id: &UserId) -> HashSet<ConnectionId> {
        let index = self.index.read().await;
        index.by_user.get(user_id).cloned().unwrap_or_default()
    }

    /// Union of the live connections of every user in `user_ids`, read under a
    /// single lock acquisition.
    pub async fn connections_for_users(&self, user_ids: &[UserId]) -> HashSet<ConnectionId> {
        let index = self.index.read().await;
        user_ids
            .iter()
            .filter_map(|id| index.by_user.get(id))
            .flatten()
            .copied()
            .collect()
    }

    pub async fn is_online(&self, user_id: &UserId) -> bool {
        let index = self.index.read().await;
        index
            .by_user
            .get(user_id)
            .is_some_and(|connections| !connections.is_empty())
    }

    pub async fn all_online_user_ids(&self) -> HashSet<UserId> {
        let index = self.index.read().await;
        index.by_user.keys().cloned().collect()
    }

    pub async fn connection_count(&self) -> usize {
        self.index.read().await.by_connection.len()
    }

    /// Panics if the forward and reverse maps disagree.
    #[cfg(test)]
    pub(crate) async fn assert_consistent(&self) {
        let index = self.index.read().await;
        for (connection, user_id) in &index.by_connection {
            assert!(
                index
                    .by_user
                    .get(user_id)
                    .is_some_and(|set| set.contains(connection)),
                "{connection} missing from reverse index of {user_id}"
            );
        }
        for (user_id, connections) in &index.by_user {
            assert!(!connections.is_empty(), "empty set kept for {user_id}");
            for connection in connections {
                assert_eq!(index.by_connection.get(connection), Some(user_id));
            }
        }
    }
}
