//! REST DTOs for the friends page and status badges.

use chrono::{DateTime, Utc};
use gauniv_domain::FriendStatus;
use serde::{Deserialize, Serialize};

/// One row of "list my relations".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDto {
    pub user_id: String,
    pub user_name: String,
    pub is_online: bool,
    pub status: FriendStatus,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceDto {
    pub user_id: String,
    pub is_online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersDto {
    pub user_ids: Vec<String>,
}
