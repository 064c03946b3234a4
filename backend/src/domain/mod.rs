//! Domain primitives, policy, and services.
//!
//! Purpose: define strongly typed entities for accounts and defects, the pure
//! authorisation rules over them, and the services that drive them through
//! the ports in [`ports`]. Types are transport agnostic; inbound adapters map
//! them to DTOs.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure with a stable code.
//! - `User`, `Role`, `PasswordHasher`: accounts and the credential store.
//! - `Defect` and its value types, plus `DefectStats`.
//! - `policy`: allow/deny decisions.
//! - `CredentialService`, `DefectService`: port implementations.

pub mod auth;
pub mod credential_service;
pub mod defect;
pub mod defect_service;
pub mod error;
pub mod password;
pub mod policy;
pub mod ports;
pub mod stats;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    INVALID_CREDENTIALS, LoginCredentials, LoginValidationError, authentication_failed,
};
pub use self::credential_service::CredentialService;
pub use self::defect::{
    Defect, DefectDraft, DefectId, DefectStatus, DefectTitle, DefectValidationError, NewDefect,
    Priority, StatusUpdate, TITLE_MAX, UserSummary, normalise_description,
};
pub use self::defect_service::DefectService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{
    PASSWORD_MIN_LENGTH, PasswordError, PasswordHash, PasswordHasher, WeakPasswordError,
    check_password_policy,
};
pub use self::stats::{DefectStats, PriorityCount, StatusCount};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Role, USERNAME_MAX, User, UserId, UserValidationError, Username};
