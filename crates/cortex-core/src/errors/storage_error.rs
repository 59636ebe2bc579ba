/// Errors surfaced by store implementations (`cortex-storage` and friends).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("row not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    #[error("uniqueness violation on {field}: {value}")]
    Conflict { field: String, value: String },

    #[error("backing store unavailable: {message}")]
    Unavailable { message: String },

    #[error("storage operation failed: {message}")]
    Operation { message: String },
}
