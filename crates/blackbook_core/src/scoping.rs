//! Resource scoping: from a request's ids to a policy-checked entity.
//!
//! # Responsibility
//! - Load the parent universe of a nested resource and enforce the policy.
//! - Distinguish "does not exist", "exists elsewhere" and "not allowed".
//!
//! # Invariants
//! - Checks run in order: existence, universe match, policy.
//! - A resource under a discarded universe does not exist.
//! - Moving a resource checks the destination universe separately and
//!   fails with `ForbiddenUniverseResourceReassignment`.

use crate::error::{BlackBookError, BlackBookResult};
use crate::model::resource::{NestedResource, ResourceId, ResourceKind};
use crate::model::universe::{Universe, UniverseId};
use crate::model::user::UserId;
use crate::policy::{self, ResourceAction, UniverseAction, Verb};
use crate::repo::universe_repo::UniverseRepository;
use crate::repo::RepoResult;
use log::debug;

/// A resolved entity together with its (live) parent universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoped<T> {
    pub resource: T,
    pub universe: Universe,
}

pub struct ResourceScope<'repo, U: UniverseRepository> {
    universes: &'repo U,
}

impl<'repo, U: UniverseRepository> ResourceScope<'repo, U> {
    pub fn new(universes: &'repo U) -> Self {
        Self { universes }
    }

    fn live_universe(&self, id: UniverseId) -> BlackBookResult<Option<Universe>> {
        Ok(self.universes.get_universe(id)?)
    }

    /// Loads a universe for a universe-level verb.
    ///
    /// # Errors
    /// - `MissingResource(universe)` for unknown or discarded ids.
    /// - `ForbiddenUniverseAction` when the policy denies `action`.
    pub fn universe(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        action: UniverseAction,
    ) -> BlackBookResult<Universe> {
        let universe = self
            .live_universe(universe_id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Universe, universe_id))?;
        policy::authorize(actor, &universe, Verb::Universe(action))?;
        Ok(universe)
    }

    /// Loads a universe to list or create `kind` resources under it.
    ///
    /// # Errors
    /// - `MissingResource(universe)` for unknown or discarded ids.
    /// - `ForbiddenUniverseResource` when the actor is not a member.
    pub fn universe_for(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        kind: ResourceKind,
        action: ResourceAction,
    ) -> BlackBookResult<Universe> {
        let universe = self
            .live_universe(universe_id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Universe, universe_id))?;
        policy::authorize(actor, &universe, Verb::Resource(kind, action))?;
        Ok(universe)
    }

    /// Resolves a nested resource by primary key and checks access.
    ///
    /// `lookup` is a global primary-key lookup. When `expected_universe` is
    /// given, a row found under another universe fails with
    /// `ResourceNotInUniverse` rather than `MissingResource`.
    pub fn resolve<T: NestedResource>(
        &self,
        actor: UserId,
        kind: ResourceKind,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
        action: ResourceAction,
        lookup: impl FnOnce(ResourceId) -> RepoResult<Option<T>>,
    ) -> BlackBookResult<Scoped<T>> {
        let resource = lookup(id)?.ok_or_else(|| BlackBookError::missing(kind, id))?;
        let universe = self
            .live_universe(resource.universe_id())?
            .ok_or_else(|| BlackBookError::missing(kind, id))?;

        if let Some(expected) = expected_universe {
            if expected != universe.id {
                debug!(
                    "event=scope_mismatch module=scoping kind={} id={} expected_universe={} actual_universe={}",
                    kind.name(),
                    id,
                    expected,
                    universe.id
                );
                return Err(BlackBookError::ResourceNotInUniverse {
                    kind,
                    resource_id: id,
                    universe_id: expected,
                });
            }
        }

        policy::authorize(actor, &universe, Verb::Resource(kind, action))?;
        Ok(Scoped { resource, universe })
    }

    /// Checks that `actor` may move a `kind` resource into `destination_id`.
    ///
    /// # Errors
    /// - `MissingResource(universe)` for unknown or discarded destinations.
    /// - `ForbiddenUniverseResourceReassignment` when the actor is not a
    ///   member of the destination.
    pub fn authorize_reassignment(
        &self,
        actor: UserId,
        kind: ResourceKind,
        destination_id: UniverseId,
    ) -> BlackBookResult<Universe> {
        let destination = self
            .live_universe(destination_id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Universe, destination_id))?;

        let verb = Verb::Resource(kind, ResourceAction::Create);
        if !policy::evaluate(actor, &destination, verb).is_allowed() {
            return Err(BlackBookError::ForbiddenUniverseResourceReassignment {
                new_universe_id: destination_id,
                kind,
            });
        }
        Ok(destination)
    }
}
