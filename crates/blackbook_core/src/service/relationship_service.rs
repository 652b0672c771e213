//! Mutual relationship use-case service.

use crate::error::{BlackBookError, BlackBookResult};
use crate::model::relationship::{Relationship, RelationshipView};
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::model::user::UserId;
use crate::pagination::{Page, Paginated};
use crate::policy::ResourceAction;
use crate::repo::named_repo::{NamedResourceRepository, SqliteNamedResourceRepository};
use crate::repo::relationship_repo::{
    NewRelationship, RelationshipRepository, SqliteRelationshipRepository,
};
use crate::repo::universe_repo::{SqliteUniverseRepository, UniverseRepository};
use crate::scoping::{ResourceScope, Scoped};
use log::info;
use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelationshipInput {
    pub first_character_id: ResourceId,
    pub first_name: String,
    pub second_character_id: ResourceId,
    pub second_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelationshipUpdate {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
}

pub struct RelationshipService<U, R, C>
where
    U: UniverseRepository,
    R: RelationshipRepository,
    C: NamedResourceRepository,
{
    universes: U,
    relationships: R,
    characters: C,
}

impl<'conn>
    RelationshipService<
        SqliteUniverseRepository<'conn>,
        SqliteRelationshipRepository<'conn>,
        SqliteNamedResourceRepository<'conn>,
    >
{
    pub fn sqlite(conn: &'conn Connection) -> BlackBookResult<Self> {
        Ok(Self::new(
            SqliteUniverseRepository::new(conn),
            SqliteRelationshipRepository::new(conn),
            SqliteNamedResourceRepository::try_new(conn, ResourceKind::Character)?,
        ))
    }
}

impl<U, R, C> RelationshipService<U, R, C>
where
    U: UniverseRepository,
    R: RelationshipRepository,
    C: NamedResourceRepository,
{
    pub fn new(universes: U, relationships: R, characters: C) -> Self {
        Self {
            universes,
            relationships,
            characters,
        }
    }

    fn scope(&self) -> ResourceScope<'_, U> {
        ResourceScope::new(&self.universes)
    }

    fn resolve(
        &self,
        actor: UserId,
        id: ResourceId,
        action: ResourceAction,
    ) -> BlackBookResult<Scoped<Relationship>> {
        self.scope().resolve(
            actor,
            ResourceKind::Relationship,
            id,
            None,
            action,
            |id| self.relationships.get_relationship(id),
        )
    }

    fn ensure_character_in(
        &self,
        character_id: ResourceId,
        universe_id: UniverseId,
    ) -> BlackBookResult<()> {
        let character = self
            .characters
            .get(character_id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Character, character_id))?;
        if character.universe_id != universe_id {
            return Err(BlackBookError::ResourceNotInUniverse {
                kind: ResourceKind::Character,
                resource_id: character_id,
                universe_id,
            });
        }
        Ok(())
    }

    pub fn list(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        page: Page,
    ) -> BlackBookResult<Paginated<Relationship>> {
        self.scope().universe_for(
            actor,
            universe_id,
            ResourceKind::Relationship,
            ResourceAction::Read,
        )?;
        Ok(self.relationships.list_relationships(universe_id, page)?)
    }

    pub fn create(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        input: &RelationshipInput,
    ) -> BlackBookResult<Relationship> {
        self.scope().universe_for(
            actor,
            universe_id,
            ResourceKind::Relationship,
            ResourceAction::Create,
        )?;
        self.ensure_character_in(input.first_character_id, universe_id)?;
        self.ensure_character_in(input.second_character_id, universe_id)?;

        let relationship = self.relationships.create_relationship(&NewRelationship {
            universe_id,
            first_character_id: input.first_character_id,
            first_name: input.first_name.clone(),
            second_character_id: input.second_character_id,
            second_name: input.second_name.clone(),
        })?;
        info!(
            "event=relationship_create module=service status=ok id={} universe_id={} actor={}",
            relationship.id, universe_id, actor
        );
        Ok(relationship)
    }

    pub fn get(&self, actor: UserId, id: ResourceId) -> BlackBookResult<Relationship> {
        Ok(self.resolve(actor, id, ResourceAction::Read)?.resource)
    }

    pub fn rename(
        &self,
        actor: UserId,
        id: ResourceId,
        update: &RelationshipUpdate,
    ) -> BlackBookResult<Relationship> {
        self.resolve(actor, id, ResourceAction::Update)?;
        self.relationships.rename_relationship(
            id,
            update.first_name.as_deref(),
            update.second_name.as_deref(),
        )?;
        self.relationships
            .get_relationship(id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Relationship, id))
    }

    pub fn delete(&self, actor: UserId, id: ResourceId) -> BlackBookResult<()> {
        self.resolve(actor, id, ResourceAction::Destroy)?;
        self.relationships.delete_relationship(id)?;
        info!(
            "event=relationship_delete module=service status=ok id={} actor={}",
            id, actor
        );
        Ok(())
    }

    /// Every relationship of a character, seen from its side.
    pub fn for_character(
        &self,
        actor: UserId,
        character_id: ResourceId,
    ) -> BlackBookResult<Vec<RelationshipView>> {
        self.scope().resolve(
            actor,
            ResourceKind::Character,
            character_id,
            None,
            ResourceAction::Read,
            |id| self.characters.get(id),
        )?;
        let views = self
            .relationships
            .list_for_character(character_id)?
            .iter()
            .filter_map(|relationship| relationship.perspective(character_id))
            .collect();
        Ok(views)
    }

    /// One relationship seen from `character_id`'s side.
    ///
    /// # Errors
    /// - `InvalidCharacterIdForRelationship` when the character is not one
    ///   of the two parties.
    pub fn view_as(
        &self,
        actor: UserId,
        character_id: ResourceId,
        id: ResourceId,
    ) -> BlackBookResult<RelationshipView> {
        let scoped = self.resolve(actor, id, ResourceAction::Read)?;
        scoped.resource.perspective(character_id).ok_or(
            BlackBookError::InvalidCharacterIdForRelationship {
                relationship_id: id,
                character_id,
            },
        )
    }
}
