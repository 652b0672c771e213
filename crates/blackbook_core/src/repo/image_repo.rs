//! Image metadata and image tag repository.
//!
//! # Invariants
//! - Tag rows carry no universe column; their universe is the image's.
//! - Moving an image to another universe removes all of its tags.
//! - A character is tagged at most once per image.

use crate::model::image::{normalize_filename, Image, ImageTag};
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::pagination::{Page, Paginated};
use crate::repo::{conflict_or_db, expect_changed, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const IMAGE_SELECT_SQL: &str =
    "SELECT id, universe_id, filename, caption, created_at, updated_at FROM images";

const TAG_SELECT_SQL: &str = "SELECT
    t.id,
    t.image_id,
    t.character_id,
    i.universe_id,
    t.created_at
FROM image_tags t
INNER JOIN images i ON i.id = t.image_id";

/// Field changes for an image update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageChanges {
    pub filename: Option<String>,
    pub caption: Option<String>,
    pub universe_id: Option<UniverseId>,
}

pub trait ImageRepository {
    fn create_image(
        &self,
        universe_id: UniverseId,
        filename: &str,
        caption: &str,
    ) -> RepoResult<Image>;
    fn get_image(&self, id: ResourceId) -> RepoResult<Option<Image>>;
    fn list_images(&self, universe_id: UniverseId, page: Page) -> RepoResult<Paginated<Image>>;
    fn update_image(&self, id: ResourceId, changes: &ImageChanges) -> RepoResult<()>;
    fn delete_image(&self, id: ResourceId) -> RepoResult<()>;

    fn create_tag(&self, image_id: ResourceId, character_id: ResourceId) -> RepoResult<ImageTag>;
    /// Looks a tag up among the tags of one image only.
    fn get_tag_in_image(
        &self,
        image_id: ResourceId,
        tag_id: ResourceId,
    ) -> RepoResult<Option<ImageTag>>;
    fn list_tags(&self, image_id: ResourceId) -> RepoResult<Vec<ImageTag>>;
    fn delete_tag(&self, tag_id: ResourceId) -> RepoResult<()>;
}

pub struct SqliteImageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteImageRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ImageRepository for SqliteImageRepository<'_> {
    fn create_image(
        &self,
        universe_id: UniverseId,
        filename: &str,
        caption: &str,
    ) -> RepoResult<Image> {
        let filename = normalize_filename(filename)?;
        self.conn.execute(
            "INSERT INTO images (universe_id, filename, caption) VALUES (?1, ?2, ?3);",
            params![universe_id, filename, caption.trim()],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_image(id)?
            .ok_or(RepoError::NotFound(ResourceKind::Image, id))
    }

    fn get_image(&self, id: ResourceId) -> RepoResult<Option<Image>> {
        let image = self
            .conn
            .query_row(
                &format!("{IMAGE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_image_row,
            )
            .optional()?;
        Ok(image)
    }

    fn list_images(&self, universe_id: UniverseId, page: Page) -> RepoResult<Paginated<Image>> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM images WHERE universe_id = ?1;",
            [universe_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "{IMAGE_SELECT_SQL}
             WHERE universe_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let items = stmt
            .query_map(
                params![universe_id, page.limit(), page.offset()],
                parse_image_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            page,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    fn update_image(&self, id: ResourceId, changes: &ImageChanges) -> RepoResult<()> {
        let filename = changes
            .filename
            .as_deref()
            .map(normalize_filename)
            .transpose()?;
        let caption = changes.caption.as_deref().map(str::trim);

        let tx = self.conn.unchecked_transaction()?;
        let previous_universe: Option<UniverseId> = tx
            .query_row("SELECT universe_id FROM images WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(previous_universe) = previous_universe else {
            return Err(RepoError::NotFound(ResourceKind::Image, id));
        };

        let changed = tx.execute(
            "UPDATE images
             SET
                filename = COALESCE(?2, filename),
                caption = COALESCE(?3, caption),
                universe_id = COALESCE(?4, universe_id),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, filename, caption, changes.universe_id],
        )?;
        expect_changed(changed, ResourceKind::Image, id)?;

        if changes
            .universe_id
            .is_some_and(|universe_id| universe_id != previous_universe)
        {
            tx.execute("DELETE FROM image_tags WHERE image_id = ?1;", [id])?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_image(&self, id: ResourceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM images WHERE id = ?1;", [id])?;
        expect_changed(changed, ResourceKind::Image, id)
    }

    fn create_tag(&self, image_id: ResourceId, character_id: ResourceId) -> RepoResult<ImageTag> {
        self.conn
            .execute(
                "INSERT INTO image_tags (image_id, character_id) VALUES (?1, ?2);",
                params![image_id, character_id],
            )
            .map_err(|err| conflict_or_db(err, "Character is already tagged in this image"))?;

        let id = self.conn.last_insert_rowid();
        self.get_tag_in_image(image_id, id)?
            .ok_or(RepoError::NotFound(ResourceKind::ImageTag, id))
    }

    fn get_tag_in_image(
        &self,
        image_id: ResourceId,
        tag_id: ResourceId,
    ) -> RepoResult<Option<ImageTag>> {
        let tag = self
            .conn
            .query_row(
                &format!("{TAG_SELECT_SQL} WHERE t.id = ?1 AND t.image_id = ?2;"),
                params![tag_id, image_id],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }

    fn list_tags(&self, image_id: ResourceId) -> RepoResult<Vec<ImageTag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} WHERE t.image_id = ?1 ORDER BY t.id ASC;"))?;
        let tags = stmt
            .query_map([image_id], parse_tag_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn delete_tag(&self, tag_id: ResourceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM image_tags WHERE id = ?1;", [tag_id])?;
        expect_changed(changed, ResourceKind::ImageTag, tag_id)
    }
}

fn parse_image_row(row: &Row<'_>) -> rusqlite::Result<Image> {
    Ok(Image {
        id: row.get("id")?,
        universe_id: row.get("universe_id")?,
        filename: row.get("filename")?,
        caption: row.get("caption")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<ImageTag> {
    Ok(ImageTag {
        id: row.get(0)?,
        image_id: row.get(1)?,
        character_id: row.get(2)?,
        universe_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}
