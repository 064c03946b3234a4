//! Authorisation rules.
//!
//! Pure decision functions over the acting user and, where relevant, the
//! target defect. A denial has no side effects; services translate it into a
//! `forbidden` error.

use super::{Defect, Error, Role, User};

/// Engineers and managers may file defects.
pub fn can_create_defect(actor: &User) -> bool {
    matches!(actor.role(), Role::Engineer | Role::Manager)
}

/// Only managers may choose an assignee when filing a defect.
pub fn can_assign_on_create(actor: &User) -> bool {
    actor.role() == Role::Manager
}

/// The author or the current assignee may change a defect's status.
pub fn can_change_status(actor: &User, defect: &Defect) -> bool {
    defect.involves(actor.id())
}

/// Only leaders may view aggregate statistics.
pub fn can_view_stats(actor: &User) -> bool {
    actor.role() == Role::Leader
}

/// The engineer roster is exposed to whoever may assign on creation.
pub fn can_list_engineers(actor: &User) -> bool {
    can_assign_on_create(actor)
}

/// Turn an optional session actor into an authenticated one.
///
/// # Examples
/// ```
/// use defect_tracker::domain::{ErrorCode, policy::require_actor};
///
/// let err = require_actor(None).expect_err("anonymous is rejected");
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
pub fn require_actor(actor: Option<User>) -> Result<User, Error> {
    actor.ok_or_else(|| Error::unauthorized("login required"))
}
