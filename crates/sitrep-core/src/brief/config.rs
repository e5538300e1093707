//! Static configuration for the brief pipeline, assembled once at startup and
//! passed explicitly into the orchestrator. Nothing here is runtime-mutable.

use crate::confidence::DEFAULT_WEIGHTS;
use crate::router::RegionalRouter;
use crate::types::Focus;
use std::time::Duration;

pub struct BriefConfig {
    pub router: RegionalRouter,
    /// (cache key, weight) pairs for the confidence scorer. Sum to 100.
    pub weights: &'static [(&'static str, u8)],

    /// Standard brief lifetimes: in-process freshness window plus longer
    /// backing-store retention (briefs are expensive; they must survive a
    /// restart even after their fresh window elapses).
    pub brief_ttl: Duration,
    pub brief_retention: Duration,
    /// Surge briefs are short-lived by design.
    pub surge_ttl: Duration,
    pub surge_retention: Duration,

    /// Output-size budgets. The synthesis merges six desk reports and gets
    /// the largest budget; the surge brief the smallest.
    pub brief_max_tokens: u32,
    pub synthesis_max_tokens: u32,
    pub surge_max_tokens: u32,

    pub temperature: f32,
    /// Client-side bound on any single completion call.
    pub completion_timeout: Duration,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            router: RegionalRouter::default(),
            weights: &DEFAULT_WEIGHTS,
            brief_ttl: Duration::from_secs(4 * 60 * 60),
            brief_retention: Duration::from_secs(24 * 60 * 60),
            surge_ttl: Duration::from_secs(30 * 60),
            surge_retention: Duration::from_secs(2 * 60 * 60),
            brief_max_tokens: 2500,
            synthesis_max_tokens: 4000,
            surge_max_tokens: 1000,
            temperature: 0.3,
            completion_timeout: Duration::from_secs(45),
        }
    }
}

impl BriefConfig {
    /// Countries whose search trends are relevant to a desk.
    pub fn trend_countries(&self, focus: Focus) -> &'static [&'static str] {
        match focus {
            Focus::Global => &["US", "CN", "RU", "IR", "UA", "IL", "TW"],
            Focus::Mideast => &["IL", "IR", "SA", "TR", "EG"],
            Focus::Ukraine => &["UA", "RU", "PL"],
            Focus::Domestic => &["US"],
            Focus::Argentina => &["AR"],
            Focus::Intel => &["RU", "CN", "IR", "TR"],
        }
    }
}
