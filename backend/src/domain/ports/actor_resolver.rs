//! Driving port resolving the session subject into the acting user.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Turns the user id held by a session into the current actor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorResolver: Send + Sync {
    /// Resolve `user_id` to a user.
    ///
    /// Returns `Ok(None)` (anonymous) when no id is supplied or the id no
    /// longer names an account. Storage failures are propagated.
    async fn resolve(&self, user_id: Option<UserId>) -> Result<Option<User>, Error>;
}
