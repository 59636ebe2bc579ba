//! Graph edge arithmetic, builder policies, and spreading-activation
//! traversal (§4.2 "Graph store and graph builder", §4.3 step 2 "Graph
//! expansion"). Operates purely in terms of `cortex_core::traits::GraphStore`
//! and `cortex_core::models::GraphEdge` — no storage of its own.

pub mod activation;
pub mod builder;
pub mod edge_ops;

pub use activation::{spreading_activation, ActivationResult, DEFAULT_FANOUT_LIMIT};
pub use edge_ops::{decay_strength, excess_indices_by_strength, merge_on_upsert, should_prune};
