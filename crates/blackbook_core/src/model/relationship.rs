//! Mutual relationships between two characters.
//!
//! # Invariants
//! - The two parties are distinct characters of the relationship's universe.
//! - Each party names the relationship from its own side ("Father" / "Son").

use crate::model::resource::{NestedResource, ResourceId};
use crate::model::universe::UniverseId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub id: ResourceId,
    pub universe_id: UniverseId,
    pub first_character_id: ResourceId,
    /// What the first character calls the relationship.
    pub first_name: String,
    pub second_character_id: ResourceId,
    /// What the second character calls the relationship.
    pub second_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One side of a relationship, as seen by `character_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipView {
    pub relationship_id: ResourceId,
    pub character_id: ResourceId,
    pub name: String,
    pub target_character_id: ResourceId,
    pub target_name: String,
}

impl Relationship {
    /// Returns `None` when `character_id` is not one of the two parties.
    pub fn perspective(&self, character_id: ResourceId) -> Option<RelationshipView> {
        let (name, target_character_id, target_name) = if character_id == self.first_character_id
        {
            (&self.first_name, self.second_character_id, &self.second_name)
        } else if character_id == self.second_character_id {
            (&self.second_name, self.first_character_id, &self.first_name)
        } else {
            return None;
        };

        Some(RelationshipView {
            relationship_id: self.id,
            character_id,
            name: name.clone(),
            target_character_id,
            target_name: target_name.clone(),
        })
    }
}

impl NestedResource for Relationship {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn universe_id(&self) -> UniverseId {
        self.universe_id
    }
}
