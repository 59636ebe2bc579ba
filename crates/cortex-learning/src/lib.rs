//! Feedback processing (§4.9, C12): explicit signals recorded directly by
//! callers and implicit signals inferred from conversation text by a
//! `LanguageReasoner`. Both paths apply the same §4.1/§4.5 feedback effect
//! table through `cortex-confidence`, differing only in
//! `MutationSourceType` and in how aggressively invalid input is tolerated
//! — implicit feedback silently drops anything it can't resolve.

pub mod engine;
pub mod explicit;
pub mod implicit;

pub use engine::LearningEngine;
