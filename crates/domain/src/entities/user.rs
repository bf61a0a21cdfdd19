//! Account as seen by the friendship subsystem.

use serde::{Deserialize, Serialize};

use crate::{UserId, UserName};

/// An account row: identity plus the name other users search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    id: UserId,
    user_name: UserName,
}

impl UserAccount {
    pub fn new(id: UserId, user_name: UserName) -> Self {
        Self { id, user_name }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }
}
