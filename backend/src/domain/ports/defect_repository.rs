//! Port abstraction for defect persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Defect, DefectId, Error, NewDefect, StatusUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by defect repository adapters.
    pub enum DefectPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "defect repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "defect repository query failed: {message}",
    }
}

impl From<DefectPersistenceError> for Error {
    fn from(error: DefectPersistenceError) -> Self {
        match error {
            DefectPersistenceError::Connection { message } => Error::service_unavailable(message),
            DefectPersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Storage boundary for defects.
///
/// Defects are never deleted. Reads return the author and assignee joined as
/// [`UserSummary`](crate::domain::UserSummary) values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefectRepository: Send + Sync {
    /// Persist a new defect and return it with its assigned identifier.
    async fn insert(&self, defect: &NewDefect) -> Result<Defect, DefectPersistenceError>;

    /// Fetch a defect by identifier.
    async fn find_by_id(&self, id: DefectId) -> Result<Option<Defect>, DefectPersistenceError>;

    /// List every defect ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Defect>, DefectPersistenceError>;

    /// Apply a guarded status write.
    ///
    /// Returns `Ok(None)` without writing when the defect is missing or its
    /// author or assignee no longer match the guard.
    async fn update_status(
        &self,
        update: &StatusUpdate,
    ) -> Result<Option<Defect>, DefectPersistenceError>;
}
