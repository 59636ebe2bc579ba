/// Errors from the background decay/pruning workers.
#[derive(Debug, thiserror::Error)]
pub enum DecayError {
    #[error("decay pass already in progress for agent {agent_id}")]
    AlreadyRunning { agent_id: String },
}
