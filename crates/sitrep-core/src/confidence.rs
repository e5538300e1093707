//! Data-completeness score for standard briefs.
//!
//! The score reflects which weighted signal sources were present and fresh in
//! the cache at generation time. It says nothing about the narrative itself
//! and must never inspect generated text.

use crate::cache::SignalCache;
use crate::types::keys;

/// Hand-tuned weighting over the signal sources a brief draws on.
/// The weights sum to exactly 100.
pub const DEFAULT_WEIGHTS: [(&str, u8); 10] = [
    (keys::CONFLICTS, 15),
    (keys::NEWS, 20),
    (keys::FEED, 10),
    (keys::MARKETS, 10),
    (keys::SOCIAL, 10),
    (keys::PROPAGANDA, 10),
    (keys::HOSTILITY, 5),
    (keys::ECONOMIC_CALENDAR, 5),
    (keys::CYBER_THREATS, 10),
    (keys::TRENDS, 5),
];

/// Score the cache against a weight table: full weight for a fresh entry,
/// half for present-but-stale, zero for absent. Rounded to the nearest
/// integer in 0..=100.
pub fn score(cache: &SignalCache, weights: &[(&str, u8)]) -> u8 {
    let mut total = 0.0f64;
    for (key, weight) in weights {
        if !cache.has(key) {
            continue;
        }
        if cache.is_fresh(key) {
            total += f64::from(*weight);
        } else {
            total += f64::from(*weight) / 2.0;
        }
    }
    total.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FRESH: Duration = Duration::from_secs(3600);

    #[test]
    fn default_weights_sum_to_exactly_100() {
        let sum: u32 = DEFAULT_WEIGHTS.iter().map(|(_, w)| u32::from(*w)).sum();
        assert_eq!(sum, 100);
    }

    #[test]
    fn empty_cache_scores_zero() {
        let cache = SignalCache::new();
        assert_eq!(score(&cache, &DEFAULT_WEIGHTS), 0);
    }

    #[test]
    fn all_fresh_scores_100() {
        let cache = SignalCache::new();
        for (key, _) in DEFAULT_WEIGHTS {
            cache.set(key, &serde_json::json!([]), FRESH);
        }
        assert_eq!(score(&cache, &DEFAULT_WEIGHTS), 100);
    }

    #[test]
    fn stale_entries_award_half_weight() {
        let cache = SignalCache::new();
        // Present with an already-expired TTL: stale but servable
        cache.set(keys::NEWS, &serde_json::json!([]), Duration::ZERO);
        assert_eq!(score(&cache, &DEFAULT_WEIGHTS), 10); // half of 20
    }

    #[test]
    fn mixed_freshness_rounds_to_nearest() {
        let cache = SignalCache::new();
        cache.set(keys::HOSTILITY, &serde_json::json!([]), Duration::ZERO); // 2.5
        assert_eq!(score(&cache, &DEFAULT_WEIGHTS), 3);

        cache.set(keys::CONFLICTS, &serde_json::json!([]), FRESH); // +15
        assert_eq!(score(&cache, &DEFAULT_WEIGHTS), 18);
    }

    #[test]
    fn score_ignores_unweighted_keys() {
        let cache = SignalCache::new();
        cache.set("brief", &serde_json::json!({}), FRESH);
        cache.set("unrelated", &serde_json::json!(1), FRESH);
        assert_eq!(score(&cache, &DEFAULT_WEIGHTS), 0);
    }
}
