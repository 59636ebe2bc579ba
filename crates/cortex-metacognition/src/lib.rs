//! Metacognition (§4/C10): the three introspective operations the
//! `reflect|confidence|uncertainty` routes expose — explaining why a
//! memory's confidence is what it is, summarizing where an agent's
//! knowledge is thin, and reviewing which learned procedures are earning
//! their keep. Read-only: nothing here mutates store state.

pub mod engine;
pub mod explain;
pub mod reflection;
pub mod uncertainty;

pub use engine::MetacognitionEngine;
