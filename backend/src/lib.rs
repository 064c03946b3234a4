//! Defect tracker backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, policy, services, and ports;
//! [`inbound`] adapts HTTP onto the driving ports; [`outbound`] implements the
//! driven ports over PostgreSQL or process memory.

pub mod bootstrap;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
