//! "List my relations" with presence badges.

use std::sync::Arc;

use gauniv_domain::UserId;
use gauniv_shared::dto::RelationDto;

use crate::infrastructure::ports::FriendRepo;
use crate::stores::PresenceRegistry;

use super::FriendError;

pub struct ListRelations {
    friends: Arc<dyn FriendRepo>,
    registry: Arc<PresenceRegistry>,
}

impl ListRelations {
    pub fn new(friends: Arc<dyn FriendRepo>, registry: Arc<PresenceRegistry>) -> Self {
        Self { friends, registry }
    }

    /// Every edge touching `viewer`, newest first, pending and accepted alike.
    pub async fn execute(&self, viewer: &UserId) -> Result<Vec<RelationDto>, FriendError> {
        let records = self.friends.list_for_user(viewer).await?;
        let online = self.registry.all_online_user_ids().await;

        let rows = records
            .into_iter()
            .filter_map(|record| {
                let other = record.edge.other_party(viewer)?;
                let status = record.edge.status_for(viewer)?;
                Some(RelationDto {
                    user_id: other.to_string(),
                    user_name: record.other_user_name.as_str().to_string(),
                    is_online: online.contains(other),
                    status,
                    added_at: record.edge.created_at(),
                })
            })
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockFriendRepo, RelationRecord, RepoError};
    use crate::test_fixtures::user;
    use chrono::{TimeZone, Utc};
    use gauniv_domain::{ConnectionId, FriendEdge, FriendStatus, UserName};

    fn record(source: &str, target: &str, accepted: bool, other: &str) -> RelationRecord {
        RelationRecord {
            edge: FriendEdge::from_storage(
                user(source),
                user(target),
                accepted,
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                None,
            ),
            other_user_name: UserName::new(other).unwrap(),
        }
    }

    #[tokio::test]
    async fn maps_records_to_rows_from_viewer_side() {
        let mut repo = MockFriendRepo::new();
        repo.expect_list_for_user().returning(|_| {
            Ok(vec![
                record("me", "ann", false, "Ann"),
                record("bo", "me", false, "Bo"),
                record("cy", "me", true, "Cy"),
            ])
        });
        let registry = Arc::new(PresenceRegistry::new());
        registry
            .register(ConnectionId::new(), user("bo"))
            .await
            .unwrap();
        let list = ListRelations::new(Arc::new(repo), registry);

        let rows = list.execute(&user("me")).await.unwrap();

        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.user_id.as_str(), r.user_name.as_str(), r.status, r.is_online))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ann", "Ann", FriendStatus::Sent, false),
                ("bo", "Bo", FriendStatus::Received, true),
                ("cy", "Cy", FriendStatus::Accepted, false),
            ]
        );
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let mut repo = MockFriendRepo::new();
        repo.expect_list_for_user()
            .returning(|_| Err(RepoError::database("list_for_user", "locked")));
        let list = ListRelations::new(Arc::new(repo), Arc::new(PresenceRegistry::new()));

        let err = list.execute(&user("me")).await.unwrap_err();

        assert!(matches!(err, FriendError::Repo(_)));
        assert!(!err.is_user_error());
    }
}
