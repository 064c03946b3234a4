//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns. Currently this is the
//! trace identifier attached to every request and response.

pub mod trace;

pub use trace::Trace;
