//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel with a `bb8` pool.
//! - **memory**: mutex-guarded repositories for demos and tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no authorisation logic.

pub mod memory;
pub mod persistence;
