//! Use-case service for characters, locations, items and traits.
//!
//! # Invariants
//! - Member operations go through `ResourceScope::resolve`.
//! - A move to another universe is authorized against the destination
//!   before anything is written.

use crate::error::{BlackBookError, BlackBookResult};
use crate::model::named::NamedResource;
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::model::user::UserId;
use crate::pagination::{Page, Paginated};
use crate::policy::ResourceAction;
use crate::repo::named_repo::{
    NamedResourceChanges, NamedResourceRepository, SqliteNamedResourceRepository,
};
use crate::repo::universe_repo::{SqliteUniverseRepository, UniverseRepository};
use crate::scoping::{ResourceScope, Scoped};
use log::info;
use rusqlite::Connection;
use serde::Deserialize;

/// Create payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NamedResourceInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Update payload. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NamedResourceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Moves the resource to another universe.
    pub universe_id: Option<UniverseId>,
}

pub struct NamedResourceService<U: UniverseRepository, R: NamedResourceRepository> {
    universes: U,
    resources: R,
}

impl<'conn>
    NamedResourceService<SqliteUniverseRepository<'conn>, SqliteNamedResourceRepository<'conn>>
{
    pub fn sqlite(conn: &'conn Connection, kind: ResourceKind) -> BlackBookResult<Self> {
        Ok(Self::new(
            SqliteUniverseRepository::new(conn),
            SqliteNamedResourceRepository::try_new(conn, kind)?,
        ))
    }
}

impl<U: UniverseRepository, R: NamedResourceRepository> NamedResourceService<U, R> {
    pub fn new(universes: U, resources: R) -> Self {
        Self {
            universes,
            resources,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.resources.kind()
    }

    fn scope(&self) -> ResourceScope<'_, U> {
        ResourceScope::new(&self.universes)
    }

    fn resolve(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
        action: ResourceAction,
    ) -> BlackBookResult<Scoped<NamedResource>> {
        self.scope().resolve(
            actor,
            self.kind(),
            id,
            expected_universe,
            action,
            |id| self.resources.get(id),
        )
    }

    pub fn list(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        page: Page,
    ) -> BlackBookResult<Paginated<NamedResource>> {
        self.scope()
            .universe_for(actor, universe_id, self.kind(), ResourceAction::Read)?;
        Ok(self.resources.list(universe_id, page)?)
    }

    pub fn create(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        input: &NamedResourceInput,
    ) -> BlackBookResult<NamedResource> {
        self.scope()
            .universe_for(actor, universe_id, self.kind(), ResourceAction::Create)?;
        let resource = self
            .resources
            .create(universe_id, &input.name, &input.description)?;
        info!(
            "event=resource_create module=service status=ok kind={} id={} universe_id={} actor={}",
            self.kind().name(),
            resource.id,
            universe_id,
            actor
        );
        Ok(resource)
    }

    pub fn get(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
    ) -> BlackBookResult<NamedResource> {
        Ok(self
            .resolve(actor, id, expected_universe, ResourceAction::Read)?
            .resource)
    }

    pub fn update(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
        update: &NamedResourceUpdate,
    ) -> BlackBookResult<NamedResource> {
        let scoped = self.resolve(actor, id, expected_universe, ResourceAction::Update)?;

        let destination = update
            .universe_id
            .filter(|destination| *destination != scoped.universe.id);
        if let Some(destination) = destination {
            self.scope()
                .authorize_reassignment(actor, self.kind(), destination)?;
        }

        let changes = NamedResourceChanges {
            name: update.name.clone(),
            description: update.description.clone(),
            universe_id: destination,
        };
        self.resources.update(id, &changes)?;

        if let Some(destination) = destination {
            info!(
                "event=resource_reassign module=service status=ok kind={} id={} from_universe={} to_universe={} actor={}",
                self.kind().name(),
                id,
                scoped.universe.id,
                destination,
                actor
            );
        }

        self.resources
            .get(id)?
            .ok_or_else(|| BlackBookError::missing(self.kind(), id))
    }

    pub fn delete(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
    ) -> BlackBookResult<()> {
        self.resolve(actor, id, expected_universe, ResourceAction::Destroy)?;
        self.resources.delete(id)?;
        info!(
            "event=resource_delete module=service status=ok kind={} id={} actor={}",
            self.kind().name(),
            id,
            actor
        );
        Ok(())
    }
}
