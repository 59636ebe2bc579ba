//! §4.5 consolidation result record.

/// `scope` parameter for an on-demand consolidation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationScope {
    /// `consolidation_status = raw` and `occurred_at >= now - 24h`.
    Recent,
    /// All `raw` episodes regardless of age.
    Full,
}

/// Counts of everything one consolidation pass did, returned to the
/// caller and folded into observability counters.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ConsolidationResult {
    pub episodes_processed: u64,
    pub semantic_extracted: u64,
    pub semantic_reinforced: u64,
    pub procedures_learned: u64,
    pub procedures_reinforced: u64,
    pub schemas_detected: u64,
    pub schemas_updated: u64,
    pub memories_decayed: u64,
    pub memories_archived: u64,
    pub memories_merged: u64,
    pub associations_created: u64,
}
