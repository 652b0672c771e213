//! Resource kinds and the nested-resource contract.

use crate::model::universe::UniverseId;

/// Primary key type shared by every nested resource table.
pub type ResourceId = i64;

/// Every entity kind that can appear in lookups and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Universe,
    Collaborator,
    Character,
    Location,
    Item,
    Trait,
    Image,
    ImageTag,
    Relationship,
}

impl ResourceKind {
    /// Kinds sharing the `{name, description}` row shape.
    pub const NAMED: [ResourceKind; 4] = [Self::Character, Self::Location, Self::Item, Self::Trait];

    /// Singular human name, as embedded in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Universe => "universe",
            Self::Collaborator => "collaborator",
            Self::Character => "character",
            Self::Location => "location",
            Self::Item => "item",
            Self::Trait => "trait",
            Self::Image => "image",
            Self::ImageTag => "image tag",
            Self::Relationship => "relationship",
        }
    }

    /// Plural human name, as embedded in error messages.
    pub fn plural(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Universe => "universes",
            Self::Collaborator => "collaborators",
            Self::Character => "characters",
            Self::Location => "locations",
            Self::Item => "items",
            Self::Trait => "traits",
            Self::Image => "images",
            Self::ImageTag => "image tags",
            Self::Relationship => "relationships",
        }
    }

    /// Singular JSON envelope key (`{"image_tag": {...}}`).
    pub fn json_key(self) -> &'static str {
        match self {
            Self::ImageTag => "image_tag",
            other => other.name(),
        }
    }

    /// Plural JSON envelope key, also used as the URL collection segment.
    pub fn json_plural_key(self) -> &'static str {
        match self {
            Self::ImageTag => "image_tags",
            other => other.plural(),
        }
    }

    pub fn is_named(self) -> bool {
        Self::NAMED.contains(&self)
    }
}

/// Entity that lives under exactly one universe.
pub trait NestedResource {
    fn id(&self) -> ResourceId;
    fn universe_id(&self) -> UniverseId;
}
