//! Universe use-case service.
//!
//! # Responsibility
//! - Create, list, rename and soft-delete universes.
//! - Manage the collaborator set.
//!
//! # Invariants
//! - Only the owner renames, destroys or changes collaborators.
//! - The owner is never added as a collaborator.

use crate::error::{BlackBookError, BlackBookResult};
use crate::model::resource::ResourceKind;
use crate::model::universe::{Universe, UniverseId};
use crate::model::user::UserId;
use crate::pagination::{Page, Paginated};
use crate::policy::UniverseAction;
use crate::repo::universe_repo::{SqliteUniverseRepository, UniverseRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::scoping::ResourceScope;
use log::info;
use rusqlite::Connection;

pub struct UniverseService<U: UniverseRepository, P: UserRepository> {
    universes: U,
    users: P,
}

impl<'conn> UniverseService<SqliteUniverseRepository<'conn>, SqliteUserRepository<'conn>> {
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteUniverseRepository::new(conn),
            SqliteUserRepository::new(conn),
        )
    }
}

impl<U: UniverseRepository, P: UserRepository> UniverseService<U, P> {
    pub fn new(universes: U, users: P) -> Self {
        Self { universes, users }
    }

    fn scope(&self) -> ResourceScope<'_, U> {
        ResourceScope::new(&self.universes)
    }

    pub fn create(&self, actor: UserId, name: &str) -> BlackBookResult<Universe> {
        let universe = self.universes.create_universe(actor, name)?;
        info!(
            "event=universe_create module=service status=ok universe_id={} actor={}",
            universe.id, actor
        );
        Ok(universe)
    }

    /// Universes the actor owns or collaborates on, discarded ones excluded.
    pub fn list(&self, actor: UserId, page: Page) -> BlackBookResult<Paginated<Universe>> {
        Ok(self.universes.list_visible_universes(actor, page)?)
    }

    pub fn get(&self, actor: UserId, id: UniverseId) -> BlackBookResult<Universe> {
        self.scope().universe(actor, id, UniverseAction::View)
    }

    pub fn rename(&self, actor: UserId, id: UniverseId, name: &str) -> BlackBookResult<Universe> {
        self.scope().universe(actor, id, UniverseAction::Update)?;
        self.universes.rename_universe(id, name)?;
        self.reload(id)
    }

    /// Soft-deletes the universe; nested rows stay for history.
    pub fn destroy(&self, actor: UserId, id: UniverseId) -> BlackBookResult<()> {
        self.scope().universe(actor, id, UniverseAction::Destroy)?;
        self.universes.discard_universe(id)?;
        info!(
            "event=universe_discard module=service status=ok universe_id={} actor={}",
            id, actor
        );
        Ok(())
    }

    pub fn add_collaborator(
        &self,
        actor: UserId,
        id: UniverseId,
        user_id: UserId,
    ) -> BlackBookResult<Universe> {
        let universe = self
            .scope()
            .universe(actor, id, UniverseAction::AddCollaborator)?;
        if self.users.get_user(user_id)?.is_none() {
            return Err(BlackBookError::missing(ResourceKind::User, user_id));
        }
        if universe.is_owner(user_id) {
            return Err(BlackBookError::invalid_record(
                "The owner of a universe cannot be a collaborator",
            ));
        }

        self.universes.add_collaborator(id, user_id)?;
        info!(
            "event=collaborator_add module=service status=ok universe_id={} user_id={} actor={}",
            id, user_id, actor
        );
        self.reload(id)
    }

    pub fn remove_collaborator(
        &self,
        actor: UserId,
        id: UniverseId,
        user_id: UserId,
    ) -> BlackBookResult<Universe> {
        self.scope()
            .universe(actor, id, UniverseAction::RemoveCollaborator)?;
        if !self.universes.remove_collaborator(id, user_id)? {
            return Err(BlackBookError::missing(ResourceKind::Collaborator, user_id));
        }
        info!(
            "event=collaborator_remove module=service status=ok universe_id={} user_id={} actor={}",
            id, user_id, actor
        );
        self.reload(id)
    }

    fn reload(&self, id: UniverseId) -> BlackBookResult<Universe> {
        self.universes
            .get_universe(id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Universe, id))
    }
}
