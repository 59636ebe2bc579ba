//! Shared domain types, errors, configuration, constants, and capability
//! traits for the Cortex cognitive memory engine. Every other crate in the
//! workspace depends on this one; this crate depends on nothing internal.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod models;
pub mod observability;
pub mod retry;
pub mod traits;

pub use errors::{CortexError, CortexResult};
