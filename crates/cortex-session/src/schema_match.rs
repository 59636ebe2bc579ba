//! §4.6 Schema matching.

use cortex_core::constants::{
    SCHEMA_MATCH_CONTEXT_WEIGHT, SCHEMA_MATCH_COSINE_WEIGHT, SCHEMA_MATCH_MIN_SCORE,
    SCHEMA_MATCH_TIME_WEIGHT, WORK_HOURS_LABEL,
};
use cortex_core::models::Schema;

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

/// `|schema.applicable_contexts ∩ input_contexts| / |schema.applicable_contexts|`.
/// A schema with no declared contexts matches nothing (no signal to fuse on).
fn context_match(schema: &Schema, input_contexts: &[String]) -> f64 {
    if schema.applicable_contexts.is_empty() {
        return 0.0;
    }
    let hits = schema
        .applicable_contexts
        .iter()
        .filter(|c| input_contexts.contains(c))
        .count();
    hits as f64 / schema.applicable_contexts.len() as f64
}

/// Exact match against the reference label is 1.0; a substring of it is
/// 0.8; anything else is 0.
fn time_match(time_of_day: Option<&str>) -> f64 {
    match time_of_day {
        Some(t) if t == WORK_HOURS_LABEL => 1.0,
        Some(t) if !t.is_empty() && WORK_HOURS_LABEL.contains(t) => 0.8,
        _ => 0.0,
    }
}

/// §4.6 score for one schema against the current query/context/time.
pub fn score_schema(
    schema: &Schema,
    query_embedding: Option<&[f32]>,
    input_contexts: &[String],
    time_of_day: Option<&str>,
) -> f64 {
    let cosine_component = match (query_embedding, &schema.embedding) {
        (Some(q), Some(s)) => cosine(q, s),
        _ => 0.0,
    };
    let raw = SCHEMA_MATCH_CONTEXT_WEIGHT * context_match(schema, input_contexts)
        + SCHEMA_MATCH_TIME_WEIGHT * time_match(time_of_day)
        + SCHEMA_MATCH_COSINE_WEIGHT * cosine_component;
    raw * schema.confidence
}

/// Score every schema, keep those `>= SCHEMA_MATCH_MIN_SCORE`, sort desc,
/// cut to `limit`.
pub fn match_schemas(
    schemas: &[Schema],
    query_embedding: Option<&[f32]>,
    input_contexts: &[String],
    time_of_day: Option<&str>,
    limit: usize,
) -> Vec<(Schema, f64)> {
    let mut scored: Vec<(Schema, f64)> = schemas
        .iter()
        .map(|s| (s.clone(), score_schema(s, query_embedding, input_contexts, time_of_day)))
        .filter(|(_, score)| *score >= SCHEMA_MATCH_MIN_SCORE)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::ids::{AgentId, TenantId};
    use cortex_core::models::SchemaType;

    fn schema_with(contexts: Vec<&str>, confidence: f64, embedding: Option<Vec<f32>>) -> Schema {
        let mut s = Schema::new(
            TenantId::new(),
            AgentId::new(),
            SchemaType::SituationTemplate,
            "name",
            "desc",
            confidence,
        );
        s.applicable_contexts = contexts.into_iter().map(String::from).collect();
        s.embedding = embedding;
        s
    }

    #[test]
    fn full_context_and_time_and_cosine_match_scores_near_confidence() {
        let schema = schema_with(vec!["coding"], 0.9, Some(vec![1.0, 0.0]));
        let score = score_schema(&schema, Some(&[1.0, 0.0]), &["coding".to_string()], Some(WORK_HOURS_LABEL));
        assert!((score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn below_threshold_schemas_are_dropped() {
        let schemas = vec![schema_with(vec!["cooking"], 0.5, None)];
        let matched = match_schemas(&schemas, None, &["coding".to_string()], None, 5);
        assert!(matched.is_empty());
    }

    #[test]
    fn time_match_substring_gets_partial_credit() {
        assert_eq!(time_match(Some("work")), 0.8);
        assert_eq!(time_match(Some(WORK_HOURS_LABEL)), 1.0);
        assert_eq!(time_match(Some("midnight")), 0.0);
    }
}
