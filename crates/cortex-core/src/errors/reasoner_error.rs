/// Errors from the language reasoner capability.
#[derive(Debug, thiserror::Error)]
pub enum ReasonerError {
    #[error("language reasoner unavailable: {message}")]
    Unavailable { message: String },

    #[error("reasoner returned malformed output: {message}")]
    MalformedOutput { message: String },

    #[error("reasoner request failed: {message}")]
    Request { message: String },
}
