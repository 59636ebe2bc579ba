use cortex_core::constants::{tier_decay_multiplier, CONFIDENCE_MAX, CONFIDENCE_MIN, PENALIZE_STEP, REINFORCE_STEP};
use cortex_core::models::Tier;

/// §4.1 Reinforce: `c' = min(0.99, c + 0.05*(1-c))` — diminishing returns.
pub fn reinforce(confidence: f64) -> f64 {
    (confidence + REINFORCE_STEP * (1.0 - confidence)).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// §4.1 Penalize: `c' = max(0, c - 0.10*c)`.
pub fn penalize(confidence: f64) -> f64 {
    (confidence - PENALIZE_STEP * confidence).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// §4.1 "Feedback effects" — deltas are added then clamped.
pub fn apply_delta(confidence: f64, delta: f64) -> f64 {
    (confidence + delta).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// §4.1 Decay: `c' = c * exp(-decay_rate * tier_multiplier * elapsed_days)`.
pub fn decay(confidence: f64, decay_rate: f64, tier: Tier, elapsed_days: f64) -> f64 {
    let multiplier = tier_decay_multiplier(tier);
    (confidence * (-decay_rate * multiplier * elapsed_days).exp()).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// §4.1 Access boost: `c' = min(0.99, c + boost)`.
pub fn access_boost(confidence: f64, boost: f64) -> f64 {
    (confidence + boost).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// §4.8 episode decay: `strength' = strength * exp(-decay_rate * days_since_access)`,
/// floor-clamped at 0.
pub fn episode_strength_decay(strength: f64, decay_rate: f64, days_since_access: f64) -> f64 {
    (strength * (-decay_rate * days_since_access).exp()).max(0.0)
}

/// `reinforcement_count` after Reinforce — always +1.
pub fn reinforce_count(count: u64) -> u64 {
    count + 1
}

/// `reinforcement_count` after Penalize — saturates at 0 (§4.1: `max(0, n-1)`).
pub fn penalize_count(count: u64) -> u64 {
    count.saturating_sub(1)
}

/// `reinforcement_count` after a signed feedback delta, saturating at 0.
pub fn apply_count_delta(count: u64, delta: i64) -> u64 {
    if delta >= 0 {
        count.saturating_add(delta as u64)
    } else {
        count.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinforce_has_diminishing_returns() {
        let c1 = reinforce(0.5);
        let c2 = reinforce(c1);
        assert!(c1 - 0.5 > c2 - c1);
    }

    #[test]
    fn reinforce_never_exceeds_ceiling() {
        let mut c = 0.9;
        for _ in 0..1000 {
            c = reinforce(c);
        }
        assert!(c <= CONFIDENCE_MAX);
    }

    #[test]
    fn penalize_floors_at_zero() {
        let mut c = 0.1;
        for _ in 0..1000 {
            c = penalize(c);
        }
        assert_eq!(c, 0.0);
    }

    #[test]
    fn decay_reduces_confidence_over_time() {
        let decayed = decay(0.9, 0.02, Tier::Warm, 10.0);
        assert!(decayed < 0.9);
    }

    #[test]
    fn episode_strength_decays_toward_zero() {
        let decayed = episode_strength_decay(1.0, 0.05, 60.0);
        assert!(decayed < 0.1);
    }

    proptest::proptest! {
        #[test]
        fn confidence_stays_bounded_under_arbitrary_mutation_sequences(
            ops in proptest::collection::vec(0u8..4, 1..200),
            start in 0.0f64..=0.99,
        ) {
            let mut c = start;
            for op in ops {
                c = match op {
                    0 => reinforce(c),
                    1 => penalize(c),
                    2 => decay(c, 0.02, Tier::Warm, 1.0),
                    _ => access_boost(c, 0.1),
                };
                proptest::prop_assert!((CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&c));
            }
        }
    }
}
