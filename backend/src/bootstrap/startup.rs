//! Startup provisioning orchestration.

use thiserror::Error;
use tracing::{info, warn};

use super::config::BootstrapSettings;
use super::roster::{Roster, RosterError};
use crate::domain::ports::UserProvisioning;
use crate::domain::{self, ErrorCode};

/// Usernames created and skipped by one bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Errors that abort bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("failed to provision {username}: {source}")]
    Provision {
        username: String,
        #[source]
        source: domain::Error,
    },
}

/// Provision the configured roster when bootstrap is enabled.
///
/// Returns `Ok(None)` when disabled. Existing usernames are skipped; any other
/// failure, including a weak password in the roster, aborts the run.
pub async fn bootstrap_users(
    settings: &BootstrapSettings,
    provisioning: &dyn UserProvisioning,
) -> Result<Option<BootstrapOutcome>, BootstrapError> {
    if !settings.enabled {
        info!(reason = "disabled", "user bootstrap skipped");
        return Ok(None);
    }

    let roster = match &settings.roster_path {
        Some(path) => Roster::load(path)?,
        None => Roster::demo(),
    };

    let mut outcome = BootstrapOutcome::default();
    for entry in roster.entries() {
        match provisioning
            .register(&entry.username, &entry.password, entry.role)
            .await
        {
            Ok(user) => outcome.created.push(user.username().to_string()),
            Err(err) if err.code() == ErrorCode::Conflict => {
                warn!(username = %entry.username, "user already exists; skipping");
                outcome.skipped.push(entry.username.clone());
            }
            Err(source) => {
                return Err(BootstrapError::Provision {
                    username: entry.username.clone(),
                    source,
                });
            }
        }
    }

    info!(
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        "user bootstrap finished"
    );
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserProvisioning;
    use crate::domain::{Error, PasswordHash, Role, User, UserId, Username};
    use rstest::rstest;

    fn enabled() -> BootstrapSettings {
        BootstrapSettings {
            enabled: true,
            roster_path: None,
        }
    }

    fn registered(username: &str, role: Role) -> User {
        User::new(
            UserId::random(),
            Username::new(username).expect("username"),
            role,
            PasswordHash::from_stored("$argon2id$fixture"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_bootstrap_touches_nothing() {
        let mut provisioning = MockUserProvisioning::new();
        provisioning.expect_register().never();

        let outcome = bootstrap_users(&BootstrapSettings::default(), &provisioning)
            .await
            .expect("disabled run succeeds");

        assert!(outcome.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn provisions_demo_roster() {
        let mut provisioning = MockUserProvisioning::new();
        provisioning
            .expect_register()
            .times(3)
            .returning(|username, _, role| Ok(registered(username, role)));

        let outcome = bootstrap_users(&enabled(), &provisioning)
            .await
            .expect("bootstrap succeeds")
            .expect("enabled");

        assert_eq!(outcome.created, ["manager", "engineer", "leader"]);
        assert!(outcome.skipped.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn existing_users_are_skipped() {
        let mut provisioning = MockUserProvisioning::new();
        provisioning
            .expect_register()
            .returning(|username, _, role| {
                if username == "engineer" {
                    Err(Error::conflict("username engineer is taken"))
                } else {
                    Ok(registered(username, role))
                }
            });

        let outcome = bootstrap_users(&enabled(), &provisioning)
            .await
            .expect("bootstrap succeeds")
            .expect("enabled");

        assert_eq!(outcome.created, ["manager", "leader"]);
        assert_eq!(outcome.skipped, ["engineer"]);
    }

    #[rstest]
    #[tokio::test]
    async fn other_failures_abort() {
        let mut provisioning = MockUserProvisioning::new();
        provisioning
            .expect_register()
            .times(1)
            .returning(|_, _, _| Err(Error::service_unavailable("database down")));

        let err = bootstrap_users(&enabled(), &provisioning)
            .await
            .expect_err("outage aborts bootstrap");

        assert!(matches!(
            err,
            BootstrapError::Provision { ref username, .. } if username == "manager"
        ));
    }
}
