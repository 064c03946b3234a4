//! Roster of users to provision.

use std::fmt;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Role;

/// One account to provision.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RosterEntry {
    /// Login name.
    pub username: String,
    /// Plaintext password, hashed on registration.
    pub password: String,
    /// Role granted to the account.
    pub role: Role,
}

impl RosterEntry {
    /// Build an entry from its parts.
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for RosterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterEntry")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Errors raised while loading a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The file could not be opened or read.
    #[error("failed to read roster at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid roster document.
    #[error("invalid roster JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered list of accounts.
///
/// Files hold a JSON array:
///
/// ```json
/// [{ "username": "manager", "password": "manager123", "role": "manager" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Vec<RosterEntry>);

impl Roster {
    /// Demo accounts, one per role.
    pub fn demo() -> Self {
        Self(vec![
            RosterEntry::new("manager", "manager123", Role::Manager),
            RosterEntry::new("engineer", "engineer123", Role::Engineer),
            RosterEntry::new("leader", "leader123", Role::Leader),
        ])
    }

    /// Parse a roster from JSON text; `path` only labels errors.
    pub fn from_json(path: &Path, contents: &str) -> Result<Self, RosterError> {
        serde_json::from_str(contents)
            .map(Self)
            .map_err(|source| RosterError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read a roster file through a capability handle on its directory.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let read_error = |source| RosterError::Read {
            path: path.to_path_buf(),
            source,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path.file_name().ok_or_else(|| {
            read_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "roster path must name a file",
            ))
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = dir.read_to_string(file_name).map_err(read_error)?;
        Self::from_json(path, &contents)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn demo_roster_covers_every_role() {
        let roster = Roster::demo();
        let roles: Vec<Role> = roster.entries().iter().map(|entry| entry.role).collect();

        assert_eq!(roles, [Role::Manager, Role::Engineer, Role::Leader]);
    }

    #[rstest]
    fn parses_lowercase_roles() {
        let roster = Roster::from_json(
            Path::new("roster.json"),
            r#"[{"username":"qa","password":"checks4all","role":"engineer"}]"#,
        )
        .expect("valid roster");

        assert_eq!(
            roster.entries(),
            [RosterEntry::new("qa", "checks4all", Role::Engineer)]
        );
    }

    #[rstest]
    #[case(r#"[{"username":"qa","password":"checks4all","role":"admin"}]"#)]
    #[case(r#"[{"username":"qa","password":"checks4all","role":"engineer","extra":1}]"#)]
    #[case("{}")]
    fn rejects_malformed_rosters(#[case] json: &str) {
        let result = Roster::from_json(Path::new("roster.json"), json);

        assert!(matches!(result, Err(RosterError::Parse { .. })));
    }

    #[rstest]
    fn loads_roster_from_disk() {
        let path = std::env::temp_dir().join(format!("roster-{}.json", Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"username":"lead","password":"watch1ng","role":"leader"}]"#,
        )
        .expect("write roster");

        let roster = Roster::load(&path);
        let _ = std::fs::remove_file(&path);

        let roster = roster.expect("roster loads");
        assert_eq!(roster.entries()[0].username, "lead");
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join(format!("absent-{}.json", Uuid::new_v4()));

        assert!(matches!(Roster::load(&path), Err(RosterError::Read { .. })));
    }

    #[rstest]
    fn debug_output_hides_passwords() {
        let rendered = format!("{:?}", RosterEntry::new("qa", "checks4all", Role::Engineer));

        assert!(!rendered.contains("checks4all"));
    }
}
