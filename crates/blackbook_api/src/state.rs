//! Shared handler state.
//!
//! # Invariants
//! - All database work runs on the blocking pool, never on async workers.
//! - The connection is used by one request at a time.

use crate::error::ApiError;
use blackbook_core::{BlackBookError, BlackBookResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection, as returned by `blackbook_core::open_db`.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `work` against the connection on the blocking thread pool.
    pub async fn run<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> BlackBookResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| BlackBookError::Internal("database mutex poisoned".to_string()))?;
            work(&conn)
        })
        .await
        .map_err(|err| BlackBookError::Internal(format!("database task failed: {err}")))?;

        Ok(joined?)
    }
}
