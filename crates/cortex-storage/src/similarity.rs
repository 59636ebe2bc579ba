/// Cosine similarity between two embeddings of equal length. Returns 0.0
/// for mismatched or zero-norm vectors rather than erroring — callers
/// treat a missing embedding as "no signal", not a fault.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Brute-force top-k by cosine similarity to `query`, descending. `items`
/// yields each candidate's id alongside its (possibly absent) embedding;
/// candidates with no embedding are dropped rather than scored as zero.
pub fn top_k_by_similarity<Id>(
    query: &[f32],
    items: impl IntoIterator<Item = (Id, Option<Vec<f32>>)>,
    k: usize,
) -> Vec<(Id, f64)> {
    let mut scored: Vec<(Id, f64)> = items
        .into_iter()
        .filter_map(|(id, emb)| emb.map(|emb| (id, cosine_similarity(query, &emb))))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}
