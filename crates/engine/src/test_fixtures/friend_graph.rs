//! In-memory account and friend edge store.

use std::sync::Mutex;

use async_trait::async_trait;
use gauniv_domain::{FriendEdge, UserAccount, UserId, UserName};

use crate::infrastructure::ports::{FriendRepo, RelationRecord, RepoError, UserRepo};

#[derive(Default)]
pub struct InMemoryFriendGraph {
    users: Mutex<Vec<UserAccount>>,
    edges: Mutex<Vec<FriendEdge>>,
}

impl InMemoryFriendGraph {
    /// A graph with one account per name; each id equals its name.
    pub fn with_users(names: &[&str]) -> Self {
        let graph = Self::default();
        {
            let mut users = graph.users.lock().unwrap();
            for name in names {
                users.push(UserAccount::new(
                    UserId::new(*name).unwrap(),
                    UserName::new(*name).unwrap(),
                ));
            }
        }
        graph
    }

    pub fn edge_count(&self) -> usize {
        self.edges.lock().unwrap().len()
    }

    fn name_of(&self, id: &UserId) -> UserName {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .map(|u| u.user_name().clone())
            .unwrap_or_else(|| UserName::new("Unknown").unwrap())
    }
}

#[async_trait]
impl FriendRepo for InMemoryFriendGraph {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RelationRecord>, RepoError> {
        let edges: Vec<FriendEdge> = self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.other_party(user_id).is_some())
            .cloned()
            .collect();
        Ok(edges
            .into_iter()
            .rev()
            .map(|edge| {
                let other = edge.other_party(user_id).cloned().unwrap();
                RelationRecord {
                    other_user_name: self.name_of(&other),
                    edge,
                }
            })
            .collect())
    }

    async fn accepted_friend_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, RepoError> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_accepted())
            .filter_map(|e| e.other_party(user_id).cloned())
            .collect())
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<FriendEdge>, RepoError> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.connects(a, b))
            .cloned())
    }

    async fn find_directed(
        &self,
        source: &UserId,
        target: &UserId,
    ) -> Result<Option<FriendEdge>, RepoError> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.source() == source && e.target() == target)
            .cloned())
    }

    async fn insert(&self, edge: &FriendEdge) -> Result<(), RepoError> {
        let mut edges = self.edges.lock().unwrap();
        if edges.iter().any(|e| e.connects(edge.source(), edge.target())) {
            return Err(RepoError::constraint("duplicate friend pair"));
        }
        edges.push(edge.clone());
        Ok(())
    }

    async fn update(&self, edge: &FriendEdge) -> Result<(), RepoError> {
        let mut edges = self.edges.lock().unwrap();
        let slot = edges
            .iter_mut()
            .find(|e| e.source() == edge.source() && e.target() == edge.target())
            .ok_or_else(|| RepoError::not_found("FriendEdge", edge.source()))?;
        *slot = edge.clone();
        Ok(())
    }

    async fn delete_between(&self, a: &UserId, b: &UserId) -> Result<bool, RepoError> {
        let mut edges = self.edges.lock().unwrap();
        let before = edges.len();
        edges.retain(|e| !e.connects(a, b));
        Ok(edges.len() != before)
    }
}

#[async_trait]
impl UserRepo for InMemoryFriendGraph {
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>, RepoError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_username(&self, user_name: &str) -> Result<Option<UserAccount>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_name().as_str().eq_ignore_ascii_case(user_name.trim()))
            .cloned())
    }

    async fn save(&self, account: &UserAccount) -> Result<(), RepoError> {
        let mut users = self.users.lock().unwrap();
        users.retain(|u| u.id() != account.id());
        users.push(account.clone());
        Ok(())
    }
}
