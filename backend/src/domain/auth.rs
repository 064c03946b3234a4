//! Login input and the authentication failure contract.
//!
//! Handlers turn raw strings into [`LoginCredentials`] before calling the
//! [`LoginService`](crate::domain::ports::LoginService) port, so blank fields
//! are rejected without touching storage.

use std::fmt;

use zeroize::Zeroizing;

use super::Error;

/// Message shared by every authentication failure.
///
/// Unknown usernames and wrong passwords must be indistinguishable.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Build the single error returned for any failed login.
pub fn authentication_failed() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS)
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is preserved verbatim and the buffer
///   is zeroed on drop.
///
/// # Examples
/// ```
/// use defect_tracker::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" manager ", "manager123").expect("valid");
/// assert_eq!(creds.username(), "manager");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
