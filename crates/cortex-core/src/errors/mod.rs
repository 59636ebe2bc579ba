mod consolidation_error;
mod cortex_error;
mod decay_error;
mod embedding_error;
mod graph_error;
mod reasoner_error;
mod storage_error;

pub use consolidation_error::ConsolidationError;
pub use cortex_error::{CortexError, CortexResult};
pub use decay_error::DecayError;
pub use embedding_error::EmbeddingError;
pub use graph_error::GraphError;
pub use reasoner_error::ReasonerError;
pub use storage_error::StorageError;
