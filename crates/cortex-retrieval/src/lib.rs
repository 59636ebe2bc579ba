//! Hybrid vector + graph recall (§4.3).

pub mod recall;

pub use recall::{RecallHit, RecallPipeline, RecallRequest};
