//! Confidence, reinforcement, decay, and tiering arithmetic (§4.1). All
//! confidence mutation in the system goes through this crate's
//! [`ConfidenceEngine`], which is the single place store updates are
//! combined with mutation-log writes.

pub mod arithmetic;
pub mod engine;

pub use engine::ConfidenceEngine;
