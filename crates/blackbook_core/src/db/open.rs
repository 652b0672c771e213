//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure the pragmas the repositories rely on.
//! - Run schema migrations before handing a connection out.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file and applies pending migrations.
///
/// Missing parent directories are created first.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::Directory {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    open_logged("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all migrations.
///
/// Every call yields an independent, empty database. Used by tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", Connection::open_in_memory)
}

fn open_logged(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(|err| ("db_open_failed", DbError::from(err)))
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn)
                .map(|()| conn)
                .map_err(|err| ("db_bootstrap_failed", err))
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err((error_code, err)) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={error_code} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
