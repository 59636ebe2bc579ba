//! Opaque 128-bit identifiers. Every entity in §3 is keyed by one of these;
//! they're thin `Uuid` wrappers so ownership scoping (`tenant_id, agent_id`)
//! can't be confused with a raw string at the type level.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(TenantId);
id_type!(AgentId);
id_type!(MemoryId);
id_type!(EpisodeId);
id_type!(ProcedureId);
id_type!(SchemaId);
id_type!(EntityId);
id_type!(SessionId);

/// Scopes every per-agent entity to its owning tenant and agent. Ownership
/// (§3 "Ownership") is enforced by requiring this on every store call — a
/// store can't accidentally return another agent's row without threading a
/// mismatched scope through every query by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentScope {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
}

impl AgentScope {
    pub fn new(tenant_id: TenantId, agent_id: AgentId) -> Self {
        Self {
            tenant_id,
            agent_id,
        }
    }
}
