//! Universe model.
//!
//! # Invariants
//! - Exactly one owner; ownership is not nullable.
//! - The owner never appears in `collaborator_ids`.
//! - `discarded_at` set means the universe is soft-deleted.

use crate::model::user::UserId;
use serde::Serialize;

pub type UniverseId = i64;

/// Universe with its membership loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Universe {
    pub id: UniverseId,
    pub name: String,
    pub owner_id: UserId,
    /// Sorted ascending.
    pub collaborator_ids: Vec<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Universe {
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    pub fn is_collaborator(&self, user_id: UserId) -> bool {
        self.collaborator_ids.binary_search(&user_id).is_ok()
    }
}
