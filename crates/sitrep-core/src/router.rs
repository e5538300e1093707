//! Keyword classifiers that select cached items by topical relevance.
//!
//! Patterns are hand-curated alternations of country names, leader surnames,
//! institutions, and conflict terminology. They are configuration, not derived
//! data. Overlap between desks is intentional: desks are topical lenses over
//! the same signal, not a partition of it.

use crate::types::Focus;
use regex::{Regex, RegexBuilder};

const MIDEAST_KW: &str = r"\b(israel|palestine|gaza|iran|iraq|syria|lebanon|yemen|houthi|saudi|gulf|turkey|egypt|jordan|hezbollah|hamas|tehran|baghdad|damascus|beirut|riyadh|qatar|bahrain|oman|kuwait|red sea|hormuz|bab.el.mandeb|sinai|idf|irgc|netanyahu)\b";

const UKRAINE_KW: &str = r"\b(ukrain|russia|kyiv|moscow|donetsk|zaporizhzhi|kherson|crimea|kursk|nato|zelensk|putin|kremlin|donbas|luhansk|mariupol|bakhmut|avdiivka|black sea|wagner|patriot|himars|f.16|storm shadow)\b";

const DOMESTIC_KW: &str = r"\b(congress|senate|house|executive order|border|immigra|tariff|trade war|fed |federal reserve|inflation|gdp|unemploy|doge|supreme court|trump|white house|biden|treasury|sec |ftc |fbi |doj |irs |epa )\b";

const ARGENTINA_KW: &str = r"\b(argentin|milei|peso|buenos aires|casa rosada|mercosur|ypf|vaca muerta|kirchner|cristina|patagonia|imf deal|blue dollar)\b";

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("router pattern must compile: {}", e))
}

/// Per-desk keyword patterns, compiled once at startup.
pub struct RegionalRouter {
    mideast: Regex,
    ukraine: Regex,
    domestic: Regex,
    argentina: Regex,
}

impl Default for RegionalRouter {
    fn default() -> Self {
        Self {
            mideast: compile(MIDEAST_KW),
            ukraine: compile(UKRAINE_KW),
            domestic: compile(DOMESTIC_KW),
            argentina: compile(ARGENTINA_KW),
        }
    }
}

impl RegionalRouter {
    /// Keyword pattern for a desk, if it has one. `Global` and `Intel`
    /// select structurally (category/severity fields) instead.
    pub fn pattern(&self, focus: Focus) -> Option<&Regex> {
        match focus {
            Focus::Mideast => Some(&self.mideast),
            Focus::Ukraine => Some(&self.ukraine),
            Focus::Domestic => Some(&self.domestic),
            Focus::Argentina => Some(&self.argentina),
            Focus::Global | Focus::Intel => None,
        }
    }

    pub fn matches(&self, focus: Focus, text: &str) -> bool {
        match self.pattern(focus) {
            Some(re) => re.is_match(text),
            None => true,
        }
    }

    /// Keep the items whose extracted text matches the desk's pattern.
    /// Desks without a pattern keep everything.
    pub fn filter<T, F>(&self, focus: Focus, mut items: Vec<T>, text: F) -> Vec<T>
    where
        F: Fn(&T) -> String,
    {
        if let Some(re) = self.pattern(focus) {
            items.retain(|item| re.is_match(&text(item)));
        }
        items
    }
}
