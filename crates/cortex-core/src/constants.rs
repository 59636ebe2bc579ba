//! Fixed tables referenced by §3/§4. These are deliberately plain
//! constants rather than config: tier boundaries, the relation set, and
//! the feedback table are invariants, not tunables.

use crate::models::{FeedbackSignalType, MentionType, RelationType, Tier};

/// Confidence bounds after every mutation (§3 Memory invariants).
pub const CONFIDENCE_MIN: f64 = 0.0;
pub const CONFIDENCE_MAX: f64 = 0.99;

/// Tier boundaries (§3 "Tiers"): hot >0.85 >= warm >0.70 >= cold >0.40 >= archive.
pub const TIER_HOT_MIN: f64 = 0.85;
pub const TIER_WARM_MIN: f64 = 0.70;
pub const TIER_COLD_MIN: f64 = 0.40;

/// Pure function of confidence — never stored state.
pub fn tier(confidence: f64) -> Tier {
    if confidence > TIER_HOT_MIN {
        Tier::Hot
    } else if confidence > TIER_WARM_MIN {
        Tier::Warm
    } else if confidence > TIER_COLD_MIN {
        Tier::Cold
    } else {
        Tier::Archive
    }
}

/// Per-tier decay multiplier (§4.1 Decay).
pub fn tier_decay_multiplier(t: Tier) -> f64 {
    match t {
        Tier::Hot => 0.5,
        Tier::Warm => 1.0,
        Tier::Cold => 1.5,
        Tier::Archive => 2.0,
    }
}

/// Reinforce step size (diminishing returns): c' = min(0.99, c + 0.05*(1-c)).
pub const REINFORCE_STEP: f64 = 0.05;

/// Penalize step size: c' = max(0, c - 0.10*c).
pub const PENALIZE_STEP: f64 = 0.10;

/// Access-boost applied on successful retrieval (§4.1).
pub const ACCESS_BOOST: f64 = 0.01;

/// Fixed feedback-effect table (§4.5 / §4.1). Deltas are added then clamped.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackEffect {
    pub confidence_delta: f64,
    pub reinforcement_delta: i64,
    pub trigger_review: bool,
    pub trigger_summarize: bool,
}

pub fn feedback_effect(signal: FeedbackSignalType) -> FeedbackEffect {
    use FeedbackSignalType::*;
    match signal {
        Helpful => FeedbackEffect {
            confidence_delta: 0.05,
            reinforcement_delta: 1,
            trigger_review: false,
            trigger_summarize: false,
        },
        Unhelpful => FeedbackEffect {
            confidence_delta: -0.10,
            reinforcement_delta: -1,
            trigger_review: false,
            trigger_summarize: false,
        },
        Used => FeedbackEffect {
            confidence_delta: 0.02,
            reinforcement_delta: 0,
            trigger_review: false,
            trigger_summarize: false,
        },
        Ignored => FeedbackEffect {
            confidence_delta: -0.02,
            reinforcement_delta: 0,
            trigger_review: false,
            trigger_summarize: false,
        },
        Contradicted => FeedbackEffect {
            confidence_delta: -0.20,
            reinforcement_delta: -2,
            trigger_review: true,
            trigger_summarize: false,
        },
        Outdated => FeedbackEffect {
            confidence_delta: -0.15,
            reinforcement_delta: -1,
            trigger_review: false,
            trigger_summarize: true,
        },
    }
}

/// Whether a relation type is stored symmetrically (§3 Graph edge).
pub fn is_symmetric(relation: RelationType) -> bool {
    matches!(
        relation,
        RelationType::EntityLink | RelationType::Thematic | RelationType::Supports
    )
}

/// Per-relation decay multiplier for graph traversal-activation attenuation
/// (§3 Graph edge, §4.3 graph expansion). Causal/contradicts decay slowest,
/// temporal fastest.
pub fn relation_decay_multiplier(relation: RelationType) -> f64 {
    use RelationType::*;
    match relation {
        Causal => 0.95,
        Contradicts => 0.95,
        Supersedes => 0.9,
        DerivedFrom => 0.85,
        Supports => 0.8,
        EntityLink => 0.75,
        Thematic => 0.7,
        Temporal => 0.5,
    }
}

/// Mention-type weight used when building entity-link edges (§3 Entity/Mention).
pub fn mention_weight(mention: MentionType) -> f64 {
    match mention {
        MentionType::Subject => 0.9,
        MentionType::Object => 0.7,
        MentionType::Context => 0.4,
    }
}

/// Edges never decay below this floor by time alone (§4.2).
pub const EDGE_STRENGTH_FLOOR: f64 = 0.05;

/// Default dedup/similarity/cluster thresholds (§4.2, §4.5, §6 configuration).
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.92;
pub const DEFAULT_SIMILAR_THRESHOLD: f64 = 0.85;
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.65;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;
pub const DEFAULT_MAX_SLOTS: usize = 7;
pub const PROCEDURE_MATCH_THRESHOLD: f64 = 0.6;

/// Working-memory pool scoring weights (§4.4 step 3): `score = α·vector_sim
/// + β·graph_act + γ·recency + δ·confidence`.
pub const WM_SCORE_VECTOR_WEIGHT: f64 = 0.4;
pub const WM_SCORE_GRAPH_WEIGHT: f64 = 0.3;
pub const WM_SCORE_RECENCY_WEIGHT: f64 = 0.15;
pub const WM_SCORE_CONFIDENCE_WEIGHT: f64 = 0.15;

/// §4.6 schema-match minimum score and fusion weights: `score =
/// 0.3·context_match + 0.2·time_match + 0.5·cosine(query, schema)`,
/// multiplied by `schema.confidence`.
pub const SCHEMA_MATCH_CONTEXT_WEIGHT: f64 = 0.3;
pub const SCHEMA_MATCH_TIME_WEIGHT: f64 = 0.2;
pub const SCHEMA_MATCH_COSINE_WEIGHT: f64 = 0.5;
pub const SCHEMA_MATCH_MIN_SCORE: f64 = 0.3;

/// Reference time-of-day label used by §4.6 `time_match`.
pub const WORK_HOURS_LABEL: &str = "work_hours";

/// Source of the belief statement a consolidation pass extracted from an
/// episode (§4.5 step 3 "Belief extraction").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceType {
    Explicit,
    Implicit,
    Behavioral,
}

/// Initial confidence for a newly created memory, by evidence strength.
pub fn initial_confidence(evidence: EvidenceType) -> f64 {
    match evidence {
        EvidenceType::Explicit => 0.9,
        EvidenceType::Implicit => 0.6,
        EvidenceType::Behavioral => 0.4,
    }
}

/// §4.5 step 5 schema-detection age floor ("stable (>=24h old)").
pub const SCHEMA_CANDIDATE_MIN_AGE_HOURS: i64 = 24;

/// §4.8 episode decay: below this `memory_strength`, an episode is archived.
pub const EPISODE_ARCHIVE_STRENGTH_FLOOR: f64 = 0.1;

/// §4.8: consecutive decay passes at the `Archive` tier before a memory is
/// deleted outright.
pub const MEMORY_ARCHIVE_TERMINAL_PASSES: u32 = 2;
