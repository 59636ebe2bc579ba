//! Per-type retention and eviction enforcement (§4.7, C11).

pub mod enforcer;

pub use enforcer::{EnforcementResult, PolicyEnforcer};
