//! Search-trends enrichment for the gathered context.
//!
//! Strictly additive: if no trends snapshot is cached, the builder
//! contributes an empty string and the brief proceeds without it.

use crate::brief::config::BriefConfig;
use crate::cache::SignalCache;
use crate::types::{keys, SignalStrength, TrendsData};

const TERMS_PER_COUNTRY: usize = 3;
const TERMS_TOTAL: usize = 10;
const MAX_SIGNALS: usize = 5;

/// Build the trends block for a desk, scoped to its countries of interest.
pub fn trends_context(cache: &SignalCache, config: &BriefConfig, focus: crate::types::Focus) -> String {
    let Some(trends) = cache.get::<TrendsData>(keys::TRENDS) else {
        return String::new();
    };

    let mut lines: Vec<String> = Vec::new();
    let mut total = 0usize;
    for country in config.trend_countries(focus) {
        if total >= TERMS_TOTAL {
            break;
        }
        let Some(terms) = trends.top_rising_by_country.get(*country) else {
            continue;
        };
        let take = TERMS_PER_COUNTRY.min(TERMS_TOTAL - total);
        let picked: Vec<String> = terms
            .iter()
            .take(take)
            .map(|t| format!("{} ({:.0})", t.term, t.score))
            .collect();
        if picked.is_empty() {
            continue;
        }
        total += picked.len();
        lines.push(format!("{}: {}", country, picked.join(", ")));
    }

    // Terms rising in several countries at once are a stronger signal than
    // any single country's list.
    let cross: Vec<String> = trends
        .multi_country_signals
        .iter()
        .filter(|s| s.country_count >= 2 && s.signal >= SignalStrength::Strong)
        .take(MAX_SIGNALS)
        .map(|s| {
            format!(
                "{} ({} countries, max score {:.0}, {:?})",
                s.term, s.country_count, s.max_score, s.signal
            )
        })
        .collect();

    if lines.is_empty() && cross.is_empty() {
        return String::new();
    }

    let mut out = String::from("SEARCH TRENDS (rising terms by country):\n");
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    if !cross.is_empty() {
        out.push_str("\nMULTI-COUNTRY TREND SIGNALS:\n");
        for line in &cross {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
