//! Mutual relationship repository.
//!
//! # Invariants
//! - Both parties are stored on one row; there is no per-side table.
//! - The two character ids differ (enforced by a CHECK constraint too).

use crate::model::normalize_required;
use crate::model::relationship::Relationship;
use crate::model::resource::{ResourceId, ResourceKind};
use crate::model::universe::UniverseId;
use crate::model::ValidationError;
use crate::pagination::{Page, Paginated};
use crate::repo::{expect_changed, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const RELATIONSHIP_SELECT_SQL: &str = "SELECT
    id,
    universe_id,
    first_character_id,
    first_name,
    second_character_id,
    second_name,
    created_at,
    updated_at
FROM mutual_relationships";

/// Input for creating a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelationship {
    pub universe_id: UniverseId,
    pub first_character_id: ResourceId,
    pub first_name: String,
    pub second_character_id: ResourceId,
    pub second_name: String,
}

pub trait RelationshipRepository {
    fn create_relationship(&self, relationship: &NewRelationship) -> RepoResult<Relationship>;
    fn get_relationship(&self, id: ResourceId) -> RepoResult<Option<Relationship>>;
    fn list_relationships(
        &self,
        universe_id: UniverseId,
        page: Page,
    ) -> RepoResult<Paginated<Relationship>>;
    fn list_for_character(&self, character_id: ResourceId) -> RepoResult<Vec<Relationship>>;
    /// Renames either side; `None` keeps the current name.
    fn rename_relationship(
        &self,
        id: ResourceId,
        first_name: Option<&str>,
        second_name: Option<&str>,
    ) -> RepoResult<()>;
    fn delete_relationship(&self, id: ResourceId) -> RepoResult<()>;
}

pub struct SqliteRelationshipRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationshipRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RelationshipRepository for SqliteRelationshipRepository<'_> {
    fn create_relationship(&self, relationship: &NewRelationship) -> RepoResult<Relationship> {
        if relationship.first_character_id == relationship.second_character_id {
            return Err(ValidationError::new("A character cannot be related to itself").into());
        }
        let first_name = normalize_required("Name", &relationship.first_name)?;
        let second_name = normalize_required("Name", &relationship.second_name)?;

        self.conn.execute(
            "INSERT INTO mutual_relationships (
                universe_id,
                first_character_id,
                first_name,
                second_character_id,
                second_name
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                relationship.universe_id,
                relationship.first_character_id,
                first_name,
                relationship.second_character_id,
                second_name,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_relationship(id)?
            .ok_or(RepoError::NotFound(ResourceKind::Relationship, id))
    }

    fn get_relationship(&self, id: ResourceId) -> RepoResult<Option<Relationship>> {
        let relationship = self
            .conn
            .query_row(
                &format!("{RELATIONSHIP_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_relationship_row,
            )
            .optional()?;
        Ok(relationship)
    }

    fn list_relationships(
        &self,
        universe_id: UniverseId,
        page: Page,
    ) -> RepoResult<Paginated<Relationship>> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM mutual_relationships WHERE universe_id = ?1;",
            [universe_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "{RELATIONSHIP_SELECT_SQL}
             WHERE universe_id = ?1
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let items = stmt
            .query_map(
                params![universe_id, page.limit(), page.offset()],
                parse_relationship_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            page,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    fn list_for_character(&self, character_id: ResourceId) -> RepoResult<Vec<Relationship>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RELATIONSHIP_SELECT_SQL}
             WHERE first_character_id = ?1 OR second_character_id = ?1
             ORDER BY id ASC;"
        ))?;
        let relationships = stmt
            .query_map([character_id], parse_relationship_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(relationships)
    }

    fn rename_relationship(
        &self,
        id: ResourceId,
        first_name: Option<&str>,
        second_name: Option<&str>,
    ) -> RepoResult<()> {
        let first_name = first_name
            .map(|name| normalize_required("Name", name))
            .transpose()?;
        let second_name = second_name
            .map(|name| normalize_required("Name", name))
            .transpose()?;

        let changed = self.conn.execute(
            "UPDATE mutual_relationships
             SET
                first_name = COALESCE(?2, first_name),
                second_name = COALESCE(?3, second_name),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, first_name, second_name],
        )?;
        expect_changed(changed, ResourceKind::Relationship, id)
    }

    fn delete_relationship(&self, id: ResourceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM mutual_relationships WHERE id = ?1;", [id])?;
        expect_changed(changed, ResourceKind::Relationship, id)
    }
}

fn parse_relationship_row(row: &Row<'_>) -> rusqlite::Result<Relationship> {
    Ok(Relationship {
        id: row.get("id")?,
        universe_id: row.get("universe_id")?,
        first_character_id: row.get("first_character_id")?,
        first_name: row.get("first_name")?,
        second_character_id: row.get("second_character_id")?,
        second_name: row.get("second_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
