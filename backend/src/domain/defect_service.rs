//! Defect lifecycle service.
//!
//! Every operation consults the authorisation policy before touching input or
//! storage. Status writes are guarded by the participants the permission check
//! observed, so a write never lands on the strength of stale facts.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::policy::{
    can_assign_on_create, can_change_status, can_create_defect, can_view_stats,
};
use crate::domain::ports::{DefectCommand, DefectQuery, DefectRepository, UserRepository};
use crate::domain::{
    Defect, DefectDraft, DefectId, DefectStats, DefectStatus, DefectTitle, DefectValidationError,
    Error, NewDefect, Priority, Role, User, UserId, Username, normalise_description,
};

/// Domain service implementing defect commands and queries.
#[derive(Clone)]
pub struct DefectService<D, U> {
    defects: Arc<D>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<D, U> DefectService<D, U> {
    /// Create a new defect service.
    pub fn new(defects: Arc<D>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            defects,
            users,
            clock,
        }
    }
}

fn validation_error(field: &str, err: DefectValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn not_found(id: DefectId) -> Error {
    Error::not_found(format!("defect {id} not found"))
}

fn parse_priority(raw: Option<&str>) -> Result<Priority, Error> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map_err(|err| validation_error("priority", err)),
        None => Ok(Priority::default()),
    }
}

impl<D, U> DefectService<D, U>
where
    U: UserRepository,
{
    /// Resolve a manager-chosen assignee.
    ///
    /// Names that do not parse, do not exist, or belong to a non-engineer
    /// resolve to `None`.
    async fn resolve_assignee(&self, raw: Option<&str>) -> Result<Option<UserId>, Error> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        let Ok(username) = Username::new(raw) else {
            debug!(assignee = raw, "dropping malformed assignee name");
            return Ok(None);
        };
        match self.users.find_by_username(&username).await? {
            Some(user) if user.role() == Role::Engineer => Ok(Some(*user.id())),
            Some(user) => {
                debug!(assignee = %username, role = %user.role(), "dropping non-engineer assignee");
                Ok(None)
            }
            None => {
                debug!(assignee = %username, "dropping unknown assignee");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<D, U> DefectCommand for DefectService<D, U>
where
    D: DefectRepository,
    U: UserRepository,
{
    async fn create(&self, actor: &User, draft: DefectDraft) -> Result<Defect, Error> {
        if !can_create_defect(actor) {
            debug!(user_id = %actor.id(), role = %actor.role(), "defect creation denied");
            return Err(Error::forbidden("only engineers and managers may file defects"));
        }

        let DefectDraft {
            title,
            description,
            priority,
            assignee_username,
        } = draft;
        let title = DefectTitle::new(title).map_err(|err| validation_error("title", err))?;
        let priority = parse_priority(priority.as_deref())?;

        let assignee_id = if can_assign_on_create(actor) {
            self.resolve_assignee(assignee_username.as_deref()).await?
        } else {
            if assignee_username.is_some() {
                debug!(user_id = %actor.id(), "ignoring assignee supplied by non-manager");
            }
            None
        };

        let new_defect = NewDefect {
            title,
            description: normalise_description(description),
            priority,
            status: DefectStatus::New,
            author_id: *actor.id(),
            assignee_id,
            created_at: self.clock.utc(),
        };
        let defect = self.defects.insert(&new_defect).await.map_err(|err| {
            warn!(error = %err, "defect insert failed");
            Error::from(err)
        })?;

        info!(
            defect_id = %defect.id,
            author_id = %actor.id(),
            assigned = defect.assignee.is_some(),
            priority = %defect.priority,
            "defect created"
        );
        Ok(defect)
    }

    async fn set_status(
        &self,
        actor: &User,
        id: DefectId,
        status: DefectStatus,
    ) -> Result<Defect, Error> {
        let defect = self
            .defects
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if !can_change_status(actor, &defect) {
            debug!(defect_id = %id, user_id = %actor.id(), "status change denied");
            return Err(Error::forbidden(
                "only the author or assignee may change a defect's status",
            ));
        }

        let update = defect.status_update(status);
        let updated = self.defects.update_status(&update).await.map_err(|err| {
            warn!(defect_id = %id, error = %err, "defect status write failed");
            Error::from(err)
        })?;
        let Some(updated) = updated else {
            warn!(defect_id = %id, user_id = %actor.id(), "status write guard no longer holds");
            return Err(Error::conflict(format!(
                "defect {id} changed while the status update was in progress"
            )));
        };

        info!(
            defect_id = %id,
            user_id = %actor.id(),
            from = %defect.status,
            to = %updated.status,
            "defect status changed"
        );
        Ok(updated)
    }
}

#[async_trait]
impl<D, U> DefectQuery for DefectService<D, U>
where
    D: DefectRepository,
    U: UserRepository,
{
    async fn list_all(&self) -> Result<Vec<Defect>, Error> {
        Ok(self.defects.list_all().await?)
    }

    async fn get(&self, id: DefectId) -> Result<Defect, Error> {
        self.defects
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn stats(&self, actor: &User) -> Result<DefectStats, Error> {
        if !can_view_stats(actor) {
            debug!(user_id = %actor.id(), role = %actor.role(), "statistics denied");
            return Err(Error::forbidden("only leaders may view statistics"));
        }
        let defects = self.defects.list_all().await?;
        Ok(DefectStats::from_defects(&defects))
    }
}

#[cfg(test)]
#[path = "defect_service_tests.rs"]
mod tests;
