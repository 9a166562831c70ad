//! User records and the user-with-events read model.

use crate::model::event::{Event, Invitee};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for users.
pub type UserId = Uuid;

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Epoch ms, assigned by storage.
    pub created_at: i64,
}

impl User {
    /// Returns the invitee reference for this user.
    pub fn as_invitee(&self) -> Invitee {
        Invitee {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// User together with every event the user is invited to.
///
/// Events are ordered by `start_time ASC, created_at ASC, id ASC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithEvents {
    pub user: User,
    pub events: Vec<Event>,
}
