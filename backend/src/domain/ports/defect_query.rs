//! Driving port for defect reads and statistics.

use async_trait::async_trait;

use crate::domain::{Defect, DefectId, DefectStats, Error, User};

/// Read-side defect use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefectQuery: Send + Sync {
    /// Every defect ordered by id; visible to any authenticated actor.
    async fn list_all(&self) -> Result<Vec<Defect>, Error>;

    /// A single defect or `not_found`.
    async fn get(&self, id: DefectId) -> Result<Defect, Error>;

    /// Aggregate counts; leaders only.
    async fn stats(&self, actor: &User) -> Result<DefectStats, Error>;
}
