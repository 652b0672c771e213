//! Image and image tag use-case service.
//!
//! # Invariants
//! - Tags are authorized through their image: a tag denial reads as a
//!   denial on the universe's images.
//! - A tagged character belongs to the image's universe.

use crate::error::{BlackBookError, BlackBookResult};
use crate::model::image::{Image, ImageTag};
use crate::model::resource::{NestedResource, ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::model::user::UserId;
use crate::pagination::{Page, Paginated};
use crate::policy::ResourceAction;
use crate::repo::image_repo::{ImageChanges, ImageRepository, SqliteImageRepository};
use crate::repo::named_repo::{NamedResourceRepository, SqliteNamedResourceRepository};
use crate::repo::universe_repo::{SqliteUniverseRepository, UniverseRepository};
use crate::scoping::{ResourceScope, Scoped};
use log::info;
use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageInput {
    pub filename: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageUpdate {
    pub filename: Option<String>,
    pub caption: Option<String>,
    pub universe_id: Option<UniverseId>,
}

pub struct ImageService<U, I, C>
where
    U: UniverseRepository,
    I: ImageRepository,
    C: NamedResourceRepository,
{
    universes: U,
    images: I,
    characters: C,
}

impl<'conn>
    ImageService<
        SqliteUniverseRepository<'conn>,
        SqliteImageRepository<'conn>,
        SqliteNamedResourceRepository<'conn>,
    >
{
    pub fn sqlite(conn: &'conn Connection) -> BlackBookResult<Self> {
        Ok(Self::new(
            SqliteUniverseRepository::new(conn),
            SqliteImageRepository::new(conn),
            SqliteNamedResourceRepository::try_new(conn, ResourceKind::Character)?,
        ))
    }
}

impl<U, I, C> ImageService<U, I, C>
where
    U: UniverseRepository,
    I: ImageRepository,
    C: NamedResourceRepository,
{
    pub fn new(universes: U, images: I, characters: C) -> Self {
        Self {
            universes,
            images,
            characters,
        }
    }

    fn scope(&self) -> ResourceScope<'_, U> {
        ResourceScope::new(&self.universes)
    }

    fn resolve_image(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
        action: ResourceAction,
    ) -> BlackBookResult<Scoped<Image>> {
        self.scope().resolve(
            actor,
            ResourceKind::Image,
            id,
            expected_universe,
            action,
            |id| self.images.get_image(id),
        )
    }

    pub fn list_images(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        page: Page,
    ) -> BlackBookResult<Paginated<Image>> {
        self.scope()
            .universe_for(actor, universe_id, ResourceKind::Image, ResourceAction::Read)?;
        Ok(self.images.list_images(universe_id, page)?)
    }

    pub fn create_image(
        &self,
        actor: UserId,
        universe_id: UniverseId,
        input: &ImageInput,
    ) -> BlackBookResult<Image> {
        self.scope()
            .universe_for(actor, universe_id, ResourceKind::Image, ResourceAction::Create)?;
        let image = self
            .images
            .create_image(universe_id, &input.filename, &input.caption)?;
        info!(
            "event=image_create module=service status=ok id={} universe_id={} actor={}",
            image.id, universe_id, actor
        );
        Ok(image)
    }

    pub fn get_image(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
    ) -> BlackBookResult<Image> {
        Ok(self
            .resolve_image(actor, id, expected_universe, ResourceAction::Read)?
            .resource)
    }

    /// Updates metadata; a move to another universe drops the image's tags.
    pub fn update_image(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
        update: &ImageUpdate,
    ) -> BlackBookResult<Image> {
        let scoped = self.resolve_image(actor, id, expected_universe, ResourceAction::Update)?;
        let destination = update
            .universe_id
            .filter(|destination| *destination != scoped.universe.id);
        if let Some(destination) = destination {
            self.scope()
                .authorize_reassignment(actor, ResourceKind::Image, destination)?;
        }

        self.images.update_image(
            id,
            &ImageChanges {
                filename: update.filename.clone(),
                caption: update.caption.clone(),
                universe_id: destination,
            },
        )?;

        self.images
            .get_image(id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Image, id))
    }

    pub fn delete_image(
        &self,
        actor: UserId,
        id: ResourceId,
        expected_universe: Option<UniverseId>,
    ) -> BlackBookResult<()> {
        self.resolve_image(actor, id, expected_universe, ResourceAction::Destroy)?;
        self.images.delete_image(id)?;
        info!(
            "event=image_delete module=service status=ok id={} actor={}",
            id, actor
        );
        Ok(())
    }

    pub fn list_tags(&self, actor: UserId, image_id: ResourceId) -> BlackBookResult<Vec<ImageTag>> {
        self.resolve_image(actor, image_id, None, ResourceAction::Read)?;
        Ok(self.images.list_tags(image_id)?)
    }

    /// Tags `character_id` in the image.
    ///
    /// # Errors
    /// - `MissingResource(character)` when the character does not exist.
    /// - `ResourceNotInUniverse` when it lives in another universe.
    pub fn tag_character(
        &self,
        actor: UserId,
        image_id: ResourceId,
        character_id: ResourceId,
    ) -> BlackBookResult<ImageTag> {
        let scoped = self.resolve_image(actor, image_id, None, ResourceAction::Update)?;
        let character = self
            .characters
            .get(character_id)?
            .ok_or_else(|| BlackBookError::missing(ResourceKind::Character, character_id))?;
        if character.universe_id() != scoped.universe.id {
            return Err(BlackBookError::ResourceNotInUniverse {
                kind: ResourceKind::Character,
                resource_id: character_id,
                universe_id: scoped.universe.id,
            });
        }

        let tag = self.images.create_tag(image_id, character_id)?;
        info!(
            "event=image_tag_create module=service status=ok id={} image_id={} character_id={} actor={}",
            tag.id, image_id, character_id, actor
        );
        Ok(tag)
    }

    /// Removes one tag. The tag is looked up among the image's tags only.
    pub fn untag(
        &self,
        actor: UserId,
        image_id: ResourceId,
        tag_id: ResourceId,
    ) -> BlackBookResult<()> {
        self.resolve_image(actor, image_id, None, ResourceAction::Update)?;
        if self.images.get_tag_in_image(image_id, tag_id)?.is_none() {
            return Err(BlackBookError::missing(ResourceKind::ImageTag, tag_id));
        }
        self.images.delete_tag(tag_id)?;
        info!(
            "event=image_tag_delete module=service status=ok id={} image_id={} actor={}",
            tag_id, image_id, actor
        );
        Ok(())
    }
}
