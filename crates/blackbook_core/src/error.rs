//! Domain failure taxonomy.
//!
//! # Responsibility
//! - Represent every failure a core operation can surface to a caller.
//! - Own the exact user-facing message and HTTP status of each failure.
//!
//! # Invariants
//! - The set of variants is closed; callers match exhaustively.
//! - Failures are terminal. Nothing here is retried.
//! - `Internal` details never reach `message()`.

use crate::db::DbError;
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BlackBookResult<T> = Result<T, BlackBookError>;

/// HTTP-level category of a failure.
///
/// Core does not depend on an HTTP stack; the boundary converts this with
/// [`ErrorStatus::as_u16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    BadRequest,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    InternalServerError,
}

impl ErrorStatus {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::UnprocessableEntity => 422,
            Self::InternalServerError => 500,
        }
    }
}

/// Typed failure of a core operation.
#[derive(Debug)]
pub enum BlackBookError {
    /// Lookup by primary key found nothing.
    MissingResource {
        kind: ResourceKind,
        id: ResourceId,
    },
    /// Universe-level verb denied. `verb` reads as "to {verb} it".
    ForbiddenUniverseAction {
        verb: &'static str,
        collaborators_allowed: bool,
    },
    /// Actor is neither owner nor collaborator of the resource's universe.
    ForbiddenUniverseResource {
        universe_id: UniverseId,
        kind: ResourceKind,
    },
    /// Actor cannot access the universe a resource is being moved into.
    ForbiddenUniverseResourceReassignment {
        new_universe_id: UniverseId,
        kind: ResourceKind,
    },
    /// Resource exists but under another universe than the one requested.
    ResourceNotInUniverse {
        kind: ResourceKind,
        resource_id: ResourceId,
        universe_id: UniverseId,
    },
    /// Character is not one of the two parties of a relationship.
    InvalidCharacterIdForRelationship {
        relationship_id: ResourceId,
        character_id: ResourceId,
    },
    InvalidPaginationParameter {
        param: &'static str,
        value: String,
        reason: String,
    },
    /// Field validation or uniqueness failure.
    InvalidRecord(Vec<String>),
    /// Anything uncategorized. The detail is for logs only.
    Internal(String),
}

impl BlackBookError {
    pub fn missing(kind: ResourceKind, id: ResourceId) -> Self {
        Self::MissingResource { kind, id }
    }

    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord(vec![message.into()])
    }

    pub fn status(&self) -> ErrorStatus {
        match self {
            Self::MissingResource { .. } => ErrorStatus::NotFound,
            Self::ForbiddenUniverseAction { .. }
            | Self::ForbiddenUniverseResource { .. }
            | Self::ForbiddenUniverseResourceReassignment { .. } => ErrorStatus::Forbidden,
            Self::ResourceNotInUniverse { .. }
            | Self::InvalidCharacterIdForRelationship { .. }
            | Self::InvalidPaginationParameter { .. } => ErrorStatus::BadRequest,
            Self::InvalidRecord(_) => ErrorStatus::UnprocessableEntity,
            Self::Internal(_) => ErrorStatus::InternalServerError,
        }
    }

    /// User-facing messages, one per entry of the `errors` array.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::InvalidRecord(messages) => messages.clone(),
            other => vec![other.message()],
        }
    }

    /// Single user-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::MissingResource { kind, id } => {
                format!("No {} with ID {id} exists.", kind.name())
            }
            Self::ForbiddenUniverseAction {
                verb,
                collaborators_allowed: true,
            } => format!("You must be an owner or collaborator of a universe to {verb} it."),
            Self::ForbiddenUniverseAction {
                verb,
                collaborators_allowed: false,
            } => format!("You must be the owner of a universe to {verb} it."),
            Self::ForbiddenUniverseResource { universe_id, kind } => format!(
                "You must be an owner or collaborator for the universe with ID {universe_id} to interact with its {}.",
                kind.plural()
            ),
            Self::ForbiddenUniverseResourceReassignment {
                new_universe_id,
                kind,
            } => format!(
                "You must be an owner or collaborator for the universe with ID {new_universe_id} to move a {} into it.",
                kind.name()
            ),
            Self::ResourceNotInUniverse {
                kind,
                resource_id,
                universe_id,
            } => format!(
                "The {} with ID {resource_id} does not belong to the universe with ID {universe_id}.",
                kind.name()
            ),
            Self::InvalidCharacterIdForRelationship {
                relationship_id,
                character_id,
            } => format!(
                "The character with ID {character_id} is not part of the relationship with ID {relationship_id}."
            ),
            Self::InvalidPaginationParameter {
                param,
                value,
                reason,
            } => format!("Invalid value '{value}' for pagination parameter '{param}': {reason}."),
            Self::InvalidRecord(messages) => messages.join("; "),
            Self::Internal(_) => "Internal server error.".to_string(),
        }
    }
}

impl Display for BlackBookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(detail) => write!(f, "internal error: {detail}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl Error for BlackBookError {}

impl From<ValidationError> for BlackBookError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidRecord(value.messages)
    }
}

impl From<RepoError> for BlackBookError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidRecord(err.messages),
            RepoError::Conflict(message) => Self::InvalidRecord(vec![message]),
            RepoError::NotFound(kind, id) => Self::MissingResource { kind, id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DbError> for BlackBookError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}
