pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Heuristic evidence-strength classification (§4.5 step 3 "initial
/// confidence from evidence type"). The reasoner hands back free-text
/// evidence rather than a typed tag, so this reads the excerpt and the
/// episode it came from for the same signals a human would use: a direct
/// quote is explicit, an observed outcome is behavioral, everything else
/// is implicit.
pub(crate) fn classify_evidence(
    evidence: &str,
    episode_outcome: Option<cortex_core::models::Outcome>,
) -> cortex_core::constants::EvidenceType {
    use cortex_core::constants::EvidenceType;
    let lower = evidence.to_lowercase();
    if evidence.contains('"')
        || lower.contains("said")
        || lower.contains("told")
        || lower.contains("stated")
        || lower.contains("explicitly")
    {
        EvidenceType::Explicit
    } else if episode_outcome.is_some() {
        EvidenceType::Behavioral
    } else {
        EvidenceType::Implicit
    }
}
