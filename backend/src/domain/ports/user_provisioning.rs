//! Driving ports for account provisioning and the engineer roster.

use async_trait::async_trait;

use crate::domain::{Error, Role, User};

/// Creates accounts (bootstrap roster, CLI provisioning).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvisioning: Send + Sync {
    /// Validate, hash, and store a new account.
    ///
    /// Fails with `invalid_request` for a bad username or weak password and
    /// with `conflict` when the username is taken.
    async fn register(&self, username: &str, password: &str, role: Role) -> Result<User, Error>;
}

/// Lists engineers available for assignment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineerDirectory: Send + Sync {
    /// Every engineer, ordered by username; managers only.
    async fn list_engineers(&self, actor: &User) -> Result<Vec<User>, Error>;
}
