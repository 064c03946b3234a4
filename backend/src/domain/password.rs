//! Password policy and one-way hashing.
//!
//! Secrets are stored as Argon2id PHC strings with a random salt. The cost
//! parameters used for new hashes are injectable; verification always uses
//! the parameters recorded inside the stored string, so hashes produced with
//! different costs stay verifiable.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Minimum number of characters a password must contain.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Reasons a candidate password is rejected by the policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeakPasswordError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("password must contain at least one letter")]
    MissingLetter,
    #[error("password must contain at least one digit")]
    MissingDigit,
}

/// Check `plaintext` against the password policy.
///
/// # Examples
/// ```
/// use defect_tracker::domain::{WeakPasswordError, check_password_policy};
///
/// assert!(check_password_policy("engineer123").is_ok());
/// assert_eq!(
///     check_password_policy("abcdefgh"),
///     Err(WeakPasswordError::MissingDigit)
/// );
/// ```
pub fn check_password_policy(plaintext: &str) -> Result<(), WeakPasswordError> {
    if plaintext.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(WeakPasswordError::TooShort {
            min: PASSWORD_MIN_LENGTH,
        });
    }
    if !plaintext.chars().any(char::is_alphabetic) {
        return Err(WeakPasswordError::MissingLetter);
    }
    if !plaintext.chars().any(|c| c.is_ascii_digit()) {
        return Err(WeakPasswordError::MissingDigit);
    }
    Ok(())
}

/// Errors raised while producing a new password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The plaintext failed the password policy.
    #[error(transparent)]
    Weak(#[from] WeakPasswordError),
    /// The hashing backend rejected its inputs.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Stored one-way password hash in PHC string format.
///
/// The value is not parsed on construction: rows read back from storage may
/// hold anything, and a malformed value simply never verifies.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored PHC string.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Argon2id hasher with configurable cost parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl PasswordHasher {
    /// Build a hasher using explicit Argon2 costs (memory KiB, iterations, lanes).
    pub fn with_costs(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|err| {
            PasswordError::Hashing {
                message: err.to_string(),
            }
        })?;
        Ok(Self { params })
    }

    /// Smallest costs Argon2 accepts; suitable for tests only.
    #[cfg(test)]
    pub(crate) fn cheap() -> Self {
        match Self::with_costs(8, 1, 1) {
            Ok(hasher) => hasher,
            Err(err) => panic!("minimum Argon2 costs must be valid: {err}"),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Validate `plaintext` against the policy and hash it with a fresh salt.
    pub fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, PasswordError> {
        check_password_policy(plaintext)?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hashing {
                message: err.to_string(),
            })?;
        Ok(PasswordHash(hash.to_string()))
    }

    /// Return `true` iff `plaintext` matches `stored`.
    pub fn verify(&self, stored: &PasswordHash, plaintext: &str) -> bool {
        let Ok(parsed) = PhcString::new(stored.as_str()) else {
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
