//! Characters, locations, items and traits.
//!
//! These four kinds share one row shape and differ only by table.

use crate::model::resource::{NestedResource, ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use serde::Serialize;

/// A name-plus-description resource nested under a universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedResource {
    #[serde(skip)]
    pub kind: ResourceKind,
    pub id: ResourceId,
    pub universe_id: UniverseId,
    pub name: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NestedResource for NamedResource {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn universe_id(&self) -> UniverseId {
        self.universe_id
    }
}
