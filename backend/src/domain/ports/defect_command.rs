//! Driving port for defect mutations.

use async_trait::async_trait;

use crate::domain::{Defect, DefectDraft, DefectId, DefectStatus, Error, User};

/// Defect lifecycle operations; each consults the authorisation policy first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefectCommand: Send + Sync {
    /// File a defect authored by `actor`.
    ///
    /// Fails with `forbidden` before any input validation when the actor may
    /// not create defects.
    async fn create(&self, actor: &User, draft: DefectDraft) -> Result<Defect, Error>;

    /// Change the status of defect `id`.
    ///
    /// Fails with `not_found`, `forbidden`, or `conflict` when the author or
    /// assignee changed between the check and the write.
    async fn set_status(
        &self,
        actor: &User,
        id: DefectId,
        status: DefectStatus,
    ) -> Result<Defect, Error>;
}
