//! Builders wiring repositories into domain services and HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use defect_tracker::domain::ports::{
    ActorResolver, DefectCommand, DefectQuery, DefectRepository, EngineerDirectory,
    LoginService, UserProvisioning, UserRepository,
};
use defect_tracker::domain::{CredentialService, DefectService, PasswordHasher};
use defect_tracker::inbound::http::state::HttpState;
use defect_tracker::outbound::memory::{MemoryDefectRepository, MemoryUserRepository};
use defect_tracker::outbound::persistence::{DbPool, DieselDefectRepository, DieselUserRepository};

use super::ServerConfig;

/// Handler state plus the provisioning port used by bootstrap.
pub struct Services {
    pub http: HttpState,
    pub provisioning: Arc<dyn UserProvisioning>,
}

/// Wire both services over one pair of repositories.
fn build_services<U, D>(users: Arc<U>, defects: Arc<D>, clock: Arc<dyn Clock>) -> Services
where
    U: UserRepository + 'static,
    D: DefectRepository + 'static,
{
    let credentials = Arc::new(CredentialService::new(users.clone(), PasswordHasher::default()));
    let defect_service = Arc::new(DefectService::new(defects, users, clock));

    Services {
        http: HttpState {
            login: credentials.clone() as Arc<dyn LoginService>,
            actors: credentials.clone() as Arc<dyn ActorResolver>,
            engineers: credentials.clone() as Arc<dyn EngineerDirectory>,
            defects_command: defect_service.clone() as Arc<dyn DefectCommand>,
            defects_query: defect_service as Arc<dyn DefectQuery>,
        },
        provisioning: credentials,
    }
}

fn build_diesel_services(pool: &DbPool) -> Services {
    build_services(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselDefectRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    )
}

fn build_memory_services() -> Services {
    let users = Arc::new(MemoryUserRepository::new());
    let defects = Arc::new(MemoryDefectRepository::new(users.clone()));
    build_services(users, defects, Arc::new(DefaultClock))
}

/// Select PostgreSQL repositories when a pool is configured, otherwise the
/// in-memory store.
pub(crate) fn build_state(config: &ServerConfig) -> Services {
    match &config.db_pool {
        Some(pool) => build_diesel_services(pool),
        None => build_memory_services(),
    }
}
