//! §3 domain model — the persistent record types owned by the kernel.

pub mod agent;
pub mod contradiction;
pub mod entity;
pub mod episode;
pub mod feedback;
pub mod graph_edge;
pub mod memory;
pub mod mutation_log;
pub mod policy;
pub mod procedure;
pub mod schema;
pub mod tenant;
pub mod working_memory;

pub use agent::Agent;
pub use contradiction::Contradiction;
pub use entity::{Entity, EntityType, Mention, MentionType};
pub use episode::{CausalLink, ConsolidationStatus, Episode, Outcome};
pub use feedback::{FeedbackSignal, FeedbackSignalType};
pub use graph_edge::{GraphEdge, RelationType};
pub use memory::{Memory, MemoryType, Provenance, Tier};
pub use mutation_log::{MutationLogEntry, MutationSourceType, MutationType};
pub use policy::MemoryTypePolicy;
pub use procedure::{ExampleExchange, Procedure};
pub use schema::{Schema, SchemaType};
pub use tenant::Tenant;
pub use working_memory::{
    ActivationSource, ActiveSchema, MemoryKind, SlotOccupant, WorkingMemorySession,
};
