//! Credential store: authentication, session actor resolution, provisioning.
//!
//! Implements the account-facing driving ports on top of a [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::auth::authentication_failed;
use crate::domain::policy::can_list_engineers;
use crate::domain::ports::{
    ActorResolver, EngineerDirectory, LoginService, UserProvisioning, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, PasswordError, PasswordHasher, Role, User, UserId, Username,
    UserValidationError,
};

/// Account service backed by a user repository.
#[derive(Clone)]
pub struct CredentialService<R> {
    users: Arc<R>,
    hasher: PasswordHasher,
}

impl<R> CredentialService<R> {
    /// Create a service hashing new passwords with `hasher`.
    pub fn new(users: Arc<R>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }
}

fn username_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "username" }))
}

fn password_error(err: PasswordError) -> Error {
    match err {
        PasswordError::Weak(weak) => {
            Error::invalid_request(weak.to_string()).with_details(json!({ "field": "password" }))
        }
        PasswordError::Hashing { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
    }
}

#[async_trait]
impl<R> LoginService for CredentialService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        // A name that could never have been registered cannot match an account.
        let Ok(username) = Username::new(credentials.username()) else {
            debug!("login rejected: malformed username");
            return Err(authentication_failed());
        };

        let user = self.users.find_by_username(&username).await?;
        match user {
            Some(user) if user.verify_password(&self.hasher, credentials.password()) => {
                info!(user_id = %user.id(), role = %user.role(), "user authenticated");
                Ok(user)
            }
            Some(user) => {
                debug!(user_id = %user.id(), "login rejected: password mismatch");
                Err(authentication_failed())
            }
            None => {
                debug!("login rejected: unknown username");
                Err(authentication_failed())
            }
        }
    }
}

#[async_trait]
impl<R> ActorResolver for CredentialService<R>
where
    R: UserRepository,
{
    async fn resolve(&self, user_id: Option<UserId>) -> Result<Option<User>, Error> {
        let Some(user_id) = user_id else {
            return Ok(None);
        };
        let user = self.users.find_by_id(&user_id).await?;
        if user.is_none() {
            warn!(%user_id, "session refers to an unknown user; treating as anonymous");
        }
        Ok(user)
    }
}

#[async_trait]
impl<R> UserProvisioning for CredentialService<R>
where
    R: UserRepository,
{
    async fn register(&self, username: &str, password: &str, role: Role) -> Result<User, Error> {
        let username = Username::new(username).map_err(username_error)?;
        let hash = self.hasher.hash_password(password).map_err(password_error)?;
        let user = User::new(UserId::random(), username, role, hash);

        self.users.insert(&user).await?;
        info!(
            user_id = %user.id(),
            username = %user.username(),
            role = %user.role(),
            "user registered"
        );
        Ok(user)
    }
}

#[async_trait]
impl<R> EngineerDirectory for CredentialService<R>
where
    R: UserRepository,
{
    async fn list_engineers(&self, actor: &User) -> Result<Vec<User>, Error> {
        if !can_list_engineers(actor) {
            debug!(user_id = %actor.id(), role = %actor.role(), "engineer roster denied");
            return Err(Error::forbidden("only managers may list engineers"));
        }
        Ok(self.users.list_by_role(Role::Engineer).await?)
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
