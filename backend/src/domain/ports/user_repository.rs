//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Error, Role, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already held by another account.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::Connection { message } => Error::service_unavailable(message),
            UserPersistenceError::Query { message } => Error::internal(message),
            UserPersistenceError::DuplicateUsername { username } => {
                Error::conflict(format!("username '{username}' is already taken"))
            }
        }
    }
}

/// Storage boundary for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; a taken username fails with
    /// [`UserPersistenceError::DuplicateUsername`].
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// List every user holding `role`, ordered by username.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError>;
}
