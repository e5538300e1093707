use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One of the six topical desks over the same underlying signal data.
///
/// Desks are lenses, not a partition; a signal item may be relevant to
/// several desks at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    /// All-source global picture. Default when no focus is requested.
    Global,
    /// Middle East / North Africa theater.
    Mideast,
    /// Russia-Ukraine conflict theater.
    Ukraine,
    /// US internal affairs: policy, legislation, economy.
    Domestic,
    /// Argentina: politics, peso, regional economics.
    Argentina,
    /// Cyber, propaganda, and signals digest.
    Intel,
}

impl Focus {
    pub const ALL: [Focus; 6] = [
        Focus::Global,
        Focus::Mideast,
        Focus::Ukraine,
        Focus::Domestic,
        Focus::Argentina,
        Focus::Intel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Global => "global",
            Focus::Mideast => "mideast",
            Focus::Ukraine => "ukraine",
            Focus::Domestic => "domestic",
            Focus::Argentina => "argentina",
            Focus::Intel => "intel",
        }
    }

    /// Parse a focus name. Unknown or empty input falls back to `Global`,
    /// matching the orchestrator's default-desk behavior.
    pub fn parse_or_global(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mideast" => Focus::Mideast,
            "ukraine" => Focus::Ukraine,
            "domestic" => Focus::Domestic,
            "argentina" => Focus::Argentina,
            "intel" => Focus::Intel,
            _ => Focus::Global,
        }
    }

    /// Cache key for this desk's brief. The global desk owns the bare
    /// `brief` key; every other desk gets a suffixed key.
    pub fn cache_key(&self) -> String {
        match self {
            Focus::Global => keys::BRIEF.to_string(),
            other => format!("{}:{}", keys::BRIEF, other.as_str()),
        }
    }
}

/// Well-known signal cache keys written by the upstream collectors.
pub mod keys {
    pub const CONFLICTS: &str = "conflicts";
    pub const NEWS: &str = "news";
    pub const FEED: &str = "feed";
    pub const SOCIAL: &str = "social";
    pub const MARKETS: &str = "markets";
    pub const PROPAGANDA: &str = "propaganda";
    pub const HOSTILITY: &str = "hostility";
    pub const ECONOMIC_CALENDAR: &str = "economic_calendar";
    pub const MACRO: &str = "macro";
    pub const CYBER_THREATS: &str = "cyber_threats";
    pub const ALERTS: &str = "alerts";
    pub const PREDICTION_MARKETS: &str = "prediction_markets";
    pub const TRENDS: &str = "trends";

    pub const BRIEF: &str = "brief";
    pub const BRIEF_EMERGENCY: &str = "brief:emergency";
}

/// Urgency tier attached to alerts and social posts by the collectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Flash,
    Urgent,
    Routine,
}

impl Priority {
    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::Flash | Priority::Urgent)
    }
}

/// Topical bucket for social posts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    Military,
    Crisis,
    Osint,
    Politics,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// Strength of a search-trend signal, as graded by the trends collector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
    Critical,
}

/// An ongoing armed conflict tracked by the conflict collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub name: String,
    pub region: String,
    pub severity: Severity,
    pub trend: String,
    pub casualties: Option<u64>,
}

/// A news item with a signed sentiment score. More negative tone means
/// more negative/critical coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub tone: f64,
    pub source: String,
}

/// A statement from a tracked leader or institution account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub handle: String,
    pub text: String,
    pub category: String,
}

/// A post from the social-media intelligence collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub text: String,
    pub author: String,
    pub category: PostCategory,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub priority: Priority,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub name: String,
    pub price: f64,
    pub delta: f64,
    /// ISO currency code for FX quotes; None for indices and commodities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSection {
    pub title: String,
    pub items: Vec<MarketQuote>,
}

/// State-media narrative digest for one country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagandaEntry {
    pub country: String,
    pub country_code: String,
    pub outlet: String,
    pub narratives: Vec<String>,
    pub sample_headlines: Vec<String>,
}

/// Bilateral hostility index derived from cross-country news tone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostilityPair {
    pub country_a: String,
    pub country_b: String,
    pub avg_tone: f64,
    pub article_count: u64,
    pub trend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub name: String,
    pub country: String,
    pub date: String,
    pub impact: Impact,
    pub actual: Option<String>,
    pub forecast: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub name: String,
    pub value: String,
    pub delta: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyberThreat {
    pub name: String,
    pub description: String,
    pub adversary: Option<String>,
    pub targeted_countries: Vec<String>,
    pub severity: Severity,
    pub malware_families: Vec<String>,
}

/// A prediction-market contract and its current odds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionMarket {
    pub question: String,
    pub yes_odds: f64,
    pub delta: f64,
}

/// One rising search term in one country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendTerm {
    pub term: String,
    pub score: f64,
}

/// A term trending in several countries at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSignal {
    pub term: String,
    pub country_count: u32,
    pub max_score: f64,
    pub signal: SignalStrength,
}

/// Public-search-trend snapshot keyed by ISO country code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsData {
    pub top_rising_by_country: HashMap<String, Vec<TrendTerm>>,
    pub multi_country_signals: Vec<TrendSignal>,
    pub updated_at: String,
}

/// A generated situation report. Immutable once produced: regeneration
/// replaces the cache entry wholesale, it never patches in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    /// Sanitized markup. Contains only allow-listed tags; raw completion
    /// output never reaches the cache or a renderer.
    pub html: String,
    pub generated_at: DateTime<Utc>,
    /// Provenance: which model produced the text.
    pub model: String,
    /// Attribution labels for the desk that produced this brief.
    pub sources: Vec<String>,
    /// Data-completeness score 0-100. Absent on surge briefs, where the
    /// keyword-scoped input set makes the standard weighting meaningless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}
