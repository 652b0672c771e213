//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Write paths persist only `NewUser::normalized()` output.
//! - Tokens are generated here and never accepted from callers.

use crate::model::user::{generate_api_token, NewUser, User, UserId};
use crate::repo::{unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, display_name, email, api_token FROM users";

pub trait UserRepository {
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_api_token(&self, token: &str) -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let user = user.normalized()?;
        let token = generate_api_token();

        self.conn
            .execute(
                "INSERT INTO users (display_name, email, api_token) VALUES (?1, ?2, ?3);",
                params![user.display_name, user.email, token],
            )
            .map_err(|err| match unique_violation(&err) {
                Some(message) if message.contains("users.email") => {
                    RepoError::Conflict("Email has already been taken".to_string())
                }
                Some(_) => RepoError::Conflict("Display name has already been taken".to_string()),
                None => RepoError::from(err),
            })?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            display_name: user.display_name,
            email: user.email,
            api_token: token,
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_api_token(&self, token: &str) -> RepoResult<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE api_token = ?1;"),
                [token],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        display_name: row.get("display_name")?,
        email: row.get("email")?,
        api_token: row.get("api_token")?,
    })
}
