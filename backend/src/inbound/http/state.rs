//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::User;
use crate::domain::policy::require_actor;
use crate::domain::ports::{
    ActorResolver, DefectCommand, DefectQuery, EngineerDirectory, LoginService,
};

use super::ApiResult;
use super::session::SessionContext;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub actors: Arc<dyn ActorResolver>,
    pub engineers: Arc<dyn EngineerDirectory>,
    pub defects_command: Arc<dyn DefectCommand>,
    pub defects_query: Arc<dyn DefectQuery>,
}

impl HttpState {
    /// Resolve the session's user, if any.
    pub async fn current_actor(&self, session: &SessionContext) -> ApiResult<Option<User>> {
        self.actors.resolve(session.user_id()?).await
    }

    /// Resolve the session's user or fail with `unauthorized`.
    pub async fn require_actor(&self, session: &SessionContext) -> ApiResult<User> {
        require_actor(self.current_actor(session).await?)
    }
}
