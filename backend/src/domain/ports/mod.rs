//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `ActorResolver`, `UserProvisioning`,
//! `EngineerDirectory`, `DefectCommand`, `DefectQuery`) are called by inbound
//! adapters. Driven ports (`UserRepository`, `DefectRepository`) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod actor_resolver;
mod defect_command;
mod defect_query;
mod defect_repository;
mod login_service;
mod user_provisioning;
mod user_repository;

pub use actor_resolver::ActorResolver;
#[cfg(test)]
pub use actor_resolver::MockActorResolver;
pub use defect_command::DefectCommand;
#[cfg(test)]
pub use defect_command::MockDefectCommand;
pub use defect_query::DefectQuery;
#[cfg(test)]
pub use defect_query::MockDefectQuery;
#[cfg(test)]
pub use defect_repository::MockDefectRepository;
pub use defect_repository::{DefectPersistenceError, DefectRepository};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use user_provisioning::{EngineerDirectory, UserProvisioning};
#[cfg(test)]
pub use user_provisioning::{MockEngineerDirectory, MockUserProvisioning};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
