//! User provisioning and token authentication.

use crate::error::BlackBookResult;
use crate::model::user::{NewUser, User};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use log::info;
use rusqlite::Connection;

pub struct UserService<P: UserRepository> {
    users: P,
}

impl<'conn> UserService<SqliteUserRepository<'conn>> {
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(SqliteUserRepository::new(conn))
    }
}

impl<P: UserRepository> UserService<P> {
    pub fn new(users: P) -> Self {
        Self { users }
    }

    /// Creates a user and issues its API token.
    pub fn register(&self, user: &NewUser) -> BlackBookResult<User> {
        let user = self.users.create_user(user)?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Resolves a bearer token. `None` means unauthenticated.
    pub fn authenticate(&self, token: &str) -> BlackBookResult<Option<User>> {
        Ok(self.users.find_by_api_token(token.trim())?)
    }
}
