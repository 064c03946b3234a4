//! Explicit startup provisioning of a user roster.
//!
//! Disabled by default. When enabled, every roster entry is registered through
//! [`UserProvisioning`](crate::domain::ports::UserProvisioning); names that
//! already exist are skipped so repeated starts are harmless.

mod config;
mod roster;
mod startup;

pub use config::BootstrapSettings;
pub use roster::{Roster, RosterEntry, RosterError};
pub use startup::{BootstrapError, BootstrapOutcome, bootstrap_users};
