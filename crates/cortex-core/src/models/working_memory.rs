use crate::ids::{AgentId, SchemaId, SessionId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of memory a slot occupant or pool candidate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Semantic,
    Episode,
    Procedure,
}

/// §4.4 "activation source" tag for pool candidates / slot occupants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationSource {
    Direct,
    Goal,
    Temporal,
    Recency,
    Spread,
}

/// One filled slot in working memory (§3 Working memory "slot occupants").
/// `occupant_id` is the stringified id of whichever entity `memory_kind`
/// names (a `MemoryId`, `EpisodeId`, or `ProcedureId`) — occupants mix
/// kinds, so the id is carried opaque the same way graph node ids are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotOccupant {
    pub memory_kind: MemoryKind,
    pub occupant_id: String,
    pub activation_level: f64,
    pub activation_source: ActivationSource,
    pub activation_cue: String,
    pub slot_position: usize,
}

/// A schema judged relevant to the current session (§3 Working memory
/// "active schemas").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSchema {
    pub schema_id: SchemaId,
    pub match_score: f64,
}

/// §3 Working memory — one session per `(agent, tenant)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemorySession {
    pub id: SessionId,
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub max_slots: usize,
    pub current_goal: Option<String>,
    pub active_context: Vec<String>,
    /// Opaque to the kernel; carried through for the caller's own use.
    pub reasoning_state: Option<serde_json::Value>,
    pub expires_at: Option<DateTime<Utc>>,
    pub occupants: Vec<SlotOccupant>,
    pub active_schemas: Vec<ActiveSchema>,
    pub updated_at: DateTime<Utc>,
}

impl WorkingMemorySession {
    pub fn new(tenant_id: TenantId, agent_id: AgentId, max_slots: usize) -> Self {
        Self {
            id: SessionId::new(),
            tenant_id,
            agent_id,
            max_slots,
            current_goal: None,
            active_context: Vec::new(),
            reasoning_state: None,
            expires_at: None,
            occupants: Vec::new(),
            active_schemas: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// §3 invariant: occupant count <= max_slots; positions contiguous
    /// 0..k-1; unique per `(session, memory_type, memory_id)`.
    pub fn occupants_are_valid(&self) -> bool {
        if self.occupants.len() > self.max_slots {
            return false;
        }
        let mut positions: Vec<usize> = self.occupants.iter().map(|o| o.slot_position).collect();
        positions.sort_unstable();
        if positions != (0..self.occupants.len()).collect::<Vec<_>>() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.occupants
            .iter()
            .all(|o| seen.insert((o.memory_kind, o.occupant_id.clone())))
    }

    /// Replace all occupants, assigning contiguous positions by input order.
    /// Clears the previous occupants first (§4.4 step 5).
    pub fn set_occupants(&mut self, mut occupants: Vec<SlotOccupant>) {
        occupants.truncate(self.max_slots);
        for (i, occ) in occupants.iter_mut().enumerate() {
            occ.slot_position = i;
        }
        self.occupants = occupants;
        self.updated_at = Utc::now();
    }
}
