//! Repository for characters, locations, items and traits.
//!
//! # Responsibility
//! - One SQLite implementation parameterized by `ResourceKind`.
//! - Reassignment between universes, including cleanup of rows that would
//!   otherwise link characters across universes.
//!
//! # Invariants
//! - Names are unique per universe.
//! - A moved character keeps no image tags and no relationships.

use crate::model::named::NamedResource;
use crate::model::normalize_required;
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::pagination::{Page, Paginated};
use crate::repo::{conflict_or_db, expect_changed, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NAME_TAKEN: &str = "Name has already been taken";

/// Field changes for an update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedResourceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Destination universe for a reassignment.
    pub universe_id: Option<UniverseId>,
}

pub trait NamedResourceRepository {
    fn kind(&self) -> ResourceKind;
    fn create(
        &self,
        universe_id: UniverseId,
        name: &str,
        description: &str,
    ) -> RepoResult<NamedResource>;
    /// Global lookup by primary key, regardless of universe.
    fn get(&self, id: ResourceId) -> RepoResult<Option<NamedResource>>;
    fn list(&self, universe_id: UniverseId, page: Page) -> RepoResult<Paginated<NamedResource>>;
    fn update(&self, id: ResourceId, changes: &NamedResourceChanges) -> RepoResult<()>;
    fn delete(&self, id: ResourceId) -> RepoResult<()>;
}

pub struct SqliteNamedResourceRepository<'conn> {
    conn: &'conn Connection,
    kind: ResourceKind,
    table: &'static str,
}

impl<'conn> SqliteNamedResourceRepository<'conn> {
    /// Fails with `InvalidData` for kinds that are not name-plus-description.
    pub fn try_new(conn: &'conn Connection, kind: ResourceKind) -> RepoResult<Self> {
        let table = table_for(kind).ok_or_else(|| {
            RepoError::InvalidData(format!("{} is not a named resource kind", kind.name()))
        })?;
        Ok(Self { conn, kind, table })
    }

    fn parse_row(&self, row: &Row<'_>) -> rusqlite::Result<NamedResource> {
        Ok(NamedResource {
            kind: self.kind,
            id: row.get("id")?,
            universe_id: row.get("universe_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT id, universe_id, name, description, created_at, updated_at FROM {}",
            self.table
        )
    }
}

impl NamedResourceRepository for SqliteNamedResourceRepository<'_> {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn create(
        &self,
        universe_id: UniverseId,
        name: &str,
        description: &str,
    ) -> RepoResult<NamedResource> {
        let name = normalize_required("Name", name)?;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (universe_id, name, description) VALUES (?1, ?2, ?3);",
                    self.table
                ),
                params![universe_id, name, description.trim()],
            )
            .map_err(|err| conflict_or_db(err, NAME_TAKEN))?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(RepoError::NotFound(self.kind, id))
    }

    fn get(&self, id: ResourceId) -> RepoResult<Option<NamedResource>> {
        let resource = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1;", self.select_sql()),
                [id],
                |row| self.parse_row(row),
            )
            .optional()?;
        Ok(resource)
    }

    fn list(&self, universe_id: UniverseId, page: Page) -> RepoResult<Paginated<NamedResource>> {
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE universe_id = ?1;", self.table),
            [universe_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "{}
             WHERE universe_id = ?1
             ORDER BY name COLLATE NOCASE ASC, id ASC
             LIMIT ?2 OFFSET ?3;",
            self.select_sql()
        ))?;
        let items = stmt
            .query_map(params![universe_id, page.limit(), page.offset()], |row| {
                self.parse_row(row)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            page,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    fn update(&self, id: ResourceId, changes: &NamedResourceChanges) -> RepoResult<()> {
        let name = changes
            .name
            .as_deref()
            .map(|name| normalize_required("Name", name))
            .transpose()?;
        let description = changes.description.as_deref().map(str::trim);

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx
            .execute(
                &format!(
                    "UPDATE {}
                     SET
                        name = COALESCE(?2, name),
                        description = COALESCE(?3, description),
                        universe_id = COALESCE(?4, universe_id),
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE id = ?1;",
                    self.table
                ),
                params![id, name, description, changes.universe_id],
            )
            .map_err(|err| conflict_or_db(err, NAME_TAKEN))?;
        expect_changed(changed, self.kind, id)?;

        if self.kind == ResourceKind::Character {
            if let Some(universe_id) = changes.universe_id {
                detach_character_from_other_universes(&tx, id, universe_id)?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: ResourceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1;", self.table), [id])?;
        expect_changed(changed, self.kind, id)
    }
}

/// Drops tags and relationships that would link a moved character to rows
/// of its previous universe.
fn detach_character_from_other_universes(
    conn: &Connection,
    character_id: ResourceId,
    universe_id: UniverseId,
) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM image_tags
         WHERE character_id = ?1
           AND image_id IN (SELECT id FROM images WHERE universe_id <> ?2);",
        params![character_id, universe_id],
    )?;
    conn.execute(
        "DELETE FROM mutual_relationships
         WHERE (first_character_id = ?1 OR second_character_id = ?1)
           AND universe_id <> ?2;",
        params![character_id, universe_id],
    )?;
    Ok(())
}

fn table_for(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Character => Some("characters"),
        ResourceKind::Location => Some("locations"),
        ResourceKind::Item => Some("items"),
        ResourceKind::Trait => Some("traits"),
        _ => None,
    }
}
