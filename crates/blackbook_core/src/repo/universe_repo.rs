//! Universe and collaboration repository.
//!
//! # Responsibility
//! - Persist universes, their soft-delete tombstone and collaborator set.
//! - Load universes with `collaborator_ids` populated.
//!
//! # Invariants
//! - `get_universe` and list queries never return discarded rows.
//! - Universe names are unique per owner; collaborations per (user, universe).

use crate::model::normalize_required;
use crate::model::resource::ResourceKind;
use crate::model::universe::{Universe, UniverseId};
use crate::model::user::UserId;
use crate::pagination::{Page, Paginated};
use crate::repo::{conflict_or_db, expect_changed, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const UNIVERSE_SELECT_SQL: &str = "SELECT
    id,
    name,
    owner_id,
    discarded_at,
    created_at,
    updated_at
FROM universes";

const VISIBLE_TO_USER_SQL: &str = "discarded_at IS NULL
    AND (
        owner_id = ?1
        OR EXISTS (
            SELECT 1 FROM collaborations c
            WHERE c.universe_id = universes.id AND c.user_id = ?1
        )
    )";

const NAME_TAKEN: &str = "Name has already been taken";

pub trait UniverseRepository {
    fn create_universe(&self, owner_id: UserId, name: &str) -> RepoResult<Universe>;
    /// Loads a live universe; a discarded one reads as `None`.
    fn get_universe(&self, id: UniverseId) -> RepoResult<Option<Universe>>;
    /// Lists live universes the user owns or collaborates on.
    fn list_visible_universes(&self, user_id: UserId, page: Page)
        -> RepoResult<Paginated<Universe>>;
    fn rename_universe(&self, id: UniverseId, name: &str) -> RepoResult<()>;
    /// Sets the tombstone. Discarding twice keeps the first timestamp.
    fn discard_universe(&self, id: UniverseId) -> RepoResult<()>;
    fn add_collaborator(&self, universe_id: UniverseId, user_id: UserId) -> RepoResult<()>;
    /// Returns `false` when the user was not a collaborator.
    fn remove_collaborator(&self, universe_id: UniverseId, user_id: UserId) -> RepoResult<bool>;
}

pub struct SqliteUniverseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUniverseRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collaborator_ids(&self, universe_id: UniverseId) -> RepoResult<Vec<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id FROM collaborations WHERE universe_id = ?1 ORDER BY user_id ASC;",
        )?;
        let ids = stmt
            .query_map([universe_id], |row| row.get::<_, UserId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn with_collaborators(&self, mut universe: Universe) -> RepoResult<Universe> {
        universe.collaborator_ids = self.collaborator_ids(universe.id)?;
        Ok(universe)
    }
}

impl UniverseRepository for SqliteUniverseRepository<'_> {
    fn create_universe(&self, owner_id: UserId, name: &str) -> RepoResult<Universe> {
        let name = normalize_required("Name", name)?;
        self.conn
            .execute(
                "INSERT INTO universes (name, owner_id) VALUES (?1, ?2);",
                params![name, owner_id],
            )
            .map_err(|err| conflict_or_db(err, NAME_TAKEN))?;

        let id = self.conn.last_insert_rowid();
        self.get_universe(id)?
            .ok_or(RepoError::NotFound(ResourceKind::Universe, id))
    }

    fn get_universe(&self, id: UniverseId) -> RepoResult<Option<Universe>> {
        let universe = self
            .conn
            .query_row(
                &format!(
                    "{UNIVERSE_SELECT_SQL}
                     WHERE id = ?1
                       AND discarded_at IS NULL;"
                ),
                [id],
                parse_universe_row,
            )
            .optional()?;

        universe
            .map(|universe| self.with_collaborators(universe))
            .transpose()
    }

    fn list_visible_universes(
        &self,
        user_id: UserId,
        page: Page,
    ) -> RepoResult<Paginated<Universe>> {
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM universes WHERE {VISIBLE_TO_USER_SQL};"),
            [user_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "{UNIVERSE_SELECT_SQL}
             WHERE {VISIBLE_TO_USER_SQL}
             ORDER BY name COLLATE NOCASE ASC, id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let rows = stmt
            .query_map(
                params![user_id, page.limit(), page.offset()],
                parse_universe_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let items = rows
            .into_iter()
            .map(|universe| self.with_collaborators(universe))
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Paginated {
            items,
            page,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    fn rename_universe(&self, id: UniverseId, name: &str) -> RepoResult<()> {
        let name = normalize_required("Name", name)?;
        let changed = self
            .conn
            .execute(
                "UPDATE universes
                 SET
                    name = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1
                   AND discarded_at IS NULL;",
                params![id, name],
            )
            .map_err(|err| conflict_or_db(err, NAME_TAKEN))?;
        expect_changed(changed, ResourceKind::Universe, id)
    }

    fn discard_universe(&self, id: UniverseId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE universes
             SET
                discarded_at = COALESCE(discarded_at, strftime('%s', 'now') * 1000),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id],
        )?;
        expect_changed(changed, ResourceKind::Universe, id)
    }

    fn add_collaborator(&self, universe_id: UniverseId, user_id: UserId) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO collaborations (user_id, universe_id) VALUES (?1, ?2);",
                params![user_id, universe_id],
            )
            .map_err(|err| conflict_or_db(err, "User is already a collaborator"))?;
        Ok(())
    }

    fn remove_collaborator(&self, universe_id: UniverseId, user_id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM collaborations WHERE universe_id = ?1 AND user_id = ?2;",
            params![universe_id, user_id],
        )?;
        Ok(changed > 0)
    }
}

fn parse_universe_row(row: &Row<'_>) -> rusqlite::Result<Universe> {
    Ok(Universe {
        id: row.get("id")?,
        name: row.get("name")?,
        owner_id: row.get("owner_id")?,
        collaborator_ids: Vec::new(),
        discarded_at: row.get("discarded_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
