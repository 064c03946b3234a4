//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{
    ActorResolver, DefectCommand, DefectQuery, EngineerDirectory, LoginService,
    MockActorResolver, MockDefectCommand, MockDefectQuery, MockEngineerDirectory,
    MockLoginService,
};
use crate::domain::{PasswordHash, Role, User, UserId, Username};

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Account with an unusable hash for handler tests.
pub fn fixture_user(name: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("valid username"),
        role,
        PasswordHash::from_stored("$argon2id$fixture"),
    )
}

/// Mock ports for one handler test; unset mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub actors: MockActorResolver,
    pub engineers: MockEngineerDirectory,
    pub defects_command: MockDefectCommand,
    pub defects_query: MockDefectQuery,
}

impl MockPorts {
    /// Make the actor resolver return `actor` for any session.
    pub fn with_actor(mut self, actor: Option<User>) -> Self {
        self.actors
            .expect_resolve()
            .returning(move |_| Ok(actor.clone()));
        self
    }

    /// Assemble handler state from the configured mocks.
    pub fn into_state(self) -> HttpState {
        let login: Arc<dyn LoginService> = Arc::new(self.login);
        let actors: Arc<dyn ActorResolver> = Arc::new(self.actors);
        let engineers: Arc<dyn EngineerDirectory> = Arc::new(self.engineers);
        let defects_command: Arc<dyn DefectCommand> = Arc::new(self.defects_command);
        let defects_query: Arc<dyn DefectQuery> = Arc::new(self.defects_query);
        HttpState {
            login,
            actors,
            engineers,
            defects_command,
            defects_query,
        }
    }
}
