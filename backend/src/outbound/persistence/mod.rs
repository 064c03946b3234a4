//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and map
//! database failures onto the port error enums. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use defect_tracker::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/defects")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_defect_repository;
mod diesel_user_repository;
mod migrate;
mod models;
mod pool;
mod schema;

pub use diesel_defect_repository::DieselDefectRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrate::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
