//! Core domain logic for BlackBook.
//! Authorization, resource scoping and persistence for universe wikis live
//! here; transport crates only translate.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod policy;
pub mod repo;
pub mod scoping;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use error::{BlackBookError, BlackBookResult, ErrorStatus};
pub use logging::{default_log_level, init_console_logging, init_logging, logging_status};
pub use model::resource::{NestedResource, ResourceId, ResourceKind};
pub use model::universe::{Universe, UniverseId};
pub use model::user::{NewUser, User, UserId};
pub use pagination::{Page, Paginated, PaginationMeta};
pub use policy::{Decision, ResourceAction, UniverseAction, Verb};
pub use repo::{RepoError, RepoResult};
pub use scoping::{ResourceScope, Scoped};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
