//! §4.8 decay pass result record.

/// Counts from one decay pass for one agent.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DecayResult {
    pub memories_decayed: u64,
    pub memories_archived_terminal: u64,
    pub episodes_decayed: u64,
    pub episodes_archived: u64,
    pub edges_decayed: u64,
    pub edges_pruned: u64,
}
