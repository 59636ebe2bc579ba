//! Working-memory activation (§4.4) and schema matching (§4.6).

pub mod pipeline;
pub mod pool;
pub mod schema_match;
pub mod slots;

pub use pipeline::{ActivationOutcome, ActivationRequest, WorkingMemoryPipeline};
