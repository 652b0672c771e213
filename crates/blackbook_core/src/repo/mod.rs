//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep SQL details out of the scoping and service layers.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Repositories never make authorization decisions.
//! - Uniqueness violations surface as `RepoError::Conflict` with a
//!   user-facing message; other SQLite failures stay `RepoError::Db`.

use crate::db::DbError;
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod image_repo;
pub mod named_repo;
pub mod relationship_repo;
pub mod universe_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every table.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Write targeted a row that no longer exists.
    NotFound(ResourceKind, ResourceId),
    /// Uniqueness constraint rejected a write.
    Conflict(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(kind, id) => write!(f, "{} not found: {id}", kind.name()),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns the SQLite message of a UNIQUE violation, e.g.
/// `UNIQUE constraint failed: users.email`.
pub(crate) fn unique_violation(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Some(message.as_deref().unwrap_or(""))
        }
        _ => None,
    }
}

/// Maps a UNIQUE violation to `Conflict(message)`, anything else to `Db`.
pub(crate) fn conflict_or_db(err: rusqlite::Error, message: &str) -> RepoError {
    if unique_violation(&err).is_some() {
        RepoError::Conflict(message.to_string())
    } else {
        err.into()
    }
}

/// Fails with `NotFound` when a write touched no row.
pub(crate) fn expect_changed(
    changed: usize,
    kind: ResourceKind,
    id: ResourceId,
) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound(kind, id));
    }
    Ok(())
}
