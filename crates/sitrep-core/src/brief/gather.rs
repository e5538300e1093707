//! Per-focus context assembly.
//!
//! Each gatherer reads the current cache snapshot, routes and ranks the
//! collections a desk cares about, and serializes minimal projections into a
//! bounded text block for the completion client. Missing collections degrade
//! to empty lists; the gatherer never fails. Free-text fields are hard-cut to
//! 150 chars so unrelated detail (and token cost) stays out of the prompt.

use crate::cache::SignalCache;
use crate::router::RegionalRouter;
use crate::types::{
    keys, Alert, Conflict, CyberThreat, EconomicEvent, FeedItem, Focus, HostilityPair, Impact,
    MacroIndicator, MarketQuote, MarketSection, NewsItem, PostCategory, PredictionMarket,
    PropagandaEntry, Severity, SocialPost,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::cmp::Ordering;

const TEXT_CLIP: usize = 150;

/// Hard truncation at a char boundary. No ellipsis; the prompt does not
/// need to know the text was cut.
fn clip(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_end, _)) => s[..byte_end].to_string(),
        None => s.to_string(),
    }
}

fn by_tone_asc(a: &NewsItem, b: &NewsItem) -> Ordering {
    a.tone.partial_cmp(&b.tone).unwrap_or(Ordering::Equal)
}

fn fetch<T: serde::de::DeserializeOwned>(cache: &SignalCache, key: &str) -> Vec<T> {
    cache.get::<Vec<T>>(key).unwrap_or_default()
}

pub(super) fn push_block(out: &mut Vec<String>, label: &str, items: Vec<Value>) {
    out.push(format!("{}: {}", label, Value::Array(items)));
}

pub(super) fn news_json(items: &[NewsItem]) -> Vec<Value> {
    items
        .iter()
        .map(|n| json!({ "headline": clip(&n.headline, TEXT_CLIP), "tone": n.tone, "source": n.source }))
        .collect()
}

pub(super) fn feed_json(items: &[FeedItem]) -> Vec<Value> {
    items
        .iter()
        .map(|f| json!({ "handle": f.handle, "text": clip(&f.text, TEXT_CLIP), "category": f.category }))
        .collect()
}

pub(super) fn social_json(items: &[SocialPost]) -> Vec<Value> {
    items
        .iter()
        .map(|p| json!({ "text": clip(&p.text, TEXT_CLIP), "author": p.author, "category": p.category }))
        .collect()
}

pub(super) fn conflict_json(items: &[Conflict]) -> Vec<Value> {
    items
        .iter()
        .map(|c| {
            json!({
                "name": c.name, "region": c.region, "severity": c.severity,
                "trend": c.trend, "casualties": c.casualties,
            })
        })
        .collect()
}

fn hostility_json(items: &[HostilityPair]) -> Vec<Value> {
    items
        .iter()
        .map(|h| {
            json!({
                "country_a": h.country_a, "country_b": h.country_b,
                "avg_tone": h.avg_tone, "trend": h.trend,
            })
        })
        .collect()
}

fn propaganda_json(items: &[PropagandaEntry]) -> Vec<Value> {
    items
        .iter()
        .map(|p| {
            json!({
                "country": p.country, "outlet": p.outlet, "narratives": p.narratives,
                "headlines": p.sample_headlines.iter().take(3).collect::<Vec<_>>(),
            })
        })
        .collect()
}

fn markets_json(sections: &[MarketSection]) -> Vec<Value> {
    sections
        .iter()
        .map(|s| {
            json!({
                "title": s.title,
                "items": s.items.iter()
                    .map(|q| json!({ "name": q.name, "price": q.price, "delta": q.delta }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect()
}

/// Assemble the context block for one desk from the current cache snapshot.
pub fn gather(cache: &SignalCache, router: &RegionalRouter, focus: Focus) -> String {
    let mut blocks = match focus {
        Focus::Global => gather_global(cache),
        Focus::Mideast => gather_mideast(cache, router),
        Focus::Ukraine => gather_ukraine(cache, router),
        Focus::Domestic => gather_domestic(cache, router),
        Focus::Argentina => gather_argentina(cache, router),
        Focus::Intel => gather_intel(cache),
    };
    // Temporal anchor so the model knows "now"
    blocks.push(format!("Current UTC: {}", Utc::now().to_rfc3339()));
    blocks.join("\n\n")
}

fn gather_global(cache: &SignalCache) -> Vec<String> {
    let conflicts: Vec<Conflict> = fetch(cache, keys::CONFLICTS);
    let mut news: Vec<NewsItem> = fetch(cache, keys::NEWS);
    let feed: Vec<FeedItem> = fetch(cache, keys::FEED);
    let markets: Vec<MarketSection> = fetch(cache, keys::MARKETS);
    let social: Vec<SocialPost> = fetch(cache, keys::SOCIAL);
    let alerts: Vec<Alert> = fetch(cache, keys::ALERTS);
    let predictions: Vec<PredictionMarket> = fetch(cache, keys::PREDICTION_MARKETS);

    news.sort_by(by_tone_asc);
    news.truncate(15);
    let urgent: Vec<SocialPost> = social.into_iter().filter(|p| p.priority.is_urgent()).take(8).collect();
    let flash: Vec<Alert> = alerts.into_iter().filter(|a| a.priority.is_urgent()).take(8).collect();

    let mut out = Vec::new();
    push_block(&mut out, "CONFLICTS", conflict_json(&conflicts[..conflicts.len().min(10)]));
    push_block(&mut out, "TOP NEWS (most negative tone)", news_json(&news));
    push_block(&mut out, "LEADER STATEMENTS", feed_json(&feed[..feed.len().min(8)]));
    push_block(&mut out, "MARKETS", markets_json(&markets));
    push_block(
        &mut out,
        "PREDICTION MARKETS",
        predictions
            .iter()
            .take(8)
            .map(|m| json!({ "question": clip(&m.question, TEXT_CLIP), "yes_odds": m.yes_odds, "delta": m.delta }))
            .collect(),
    );
    push_block(&mut out, "URGENT POSTS", social_json(&urgent));
    push_block(
        &mut out,
        "ACTIVE ALERTS",
        flash
            .iter()
            .map(|a| json!({ "title": clip(&a.title, TEXT_CLIP), "priority": a.priority, "source": a.source }))
            .collect(),
    );
    out
}

fn gather_mideast(cache: &SignalCache, router: &RegionalRouter) -> Vec<String> {
    gather_theater(
        cache,
        router,
        Focus::Mideast,
        "MIDDLE EAST CONFLICTS",
        &[PostCategory::Crisis, PostCategory::Military],
        |p| matches!(p.country_code.as_str(), "IR" | "TR"),
        "STATE MEDIA NARRATIVES (Iran, Turkey)",
    )
}

fn gather_ukraine(cache: &SignalCache, router: &RegionalRouter) -> Vec<String> {
    gather_theater(
        cache,
        router,
        Focus::Ukraine,
        "UKRAINE THEATER CONFLICTS",
        &[PostCategory::Military],
        |p| p.country_code == "RU",
        "RUSSIAN STATE MEDIA NARRATIVES",
    )
}

/// Shared shape of the two conflict-theater desks: router-filtered conflicts,
/// news, statements, and posts, plus hostility pairs and a scoped propaganda
/// digest.
fn gather_theater(
    cache: &SignalCache,
    router: &RegionalRouter,
    focus: Focus,
    conflicts_label: &str,
    post_categories: &[PostCategory],
    propaganda_scope: impl Fn(&PropagandaEntry) -> bool,
    propaganda_label: &str,
) -> Vec<String> {
    let conflicts: Vec<Conflict> = fetch(cache, keys::CONFLICTS);
    let news: Vec<NewsItem> = fetch(cache, keys::NEWS);
    let feed: Vec<FeedItem> = fetch(cache, keys::FEED);
    let social: Vec<SocialPost> = fetch(cache, keys::SOCIAL);
    let hostility: Vec<HostilityPair> = fetch(cache, keys::HOSTILITY);
    let propaganda: Vec<PropagandaEntry> = fetch(cache, keys::PROPAGANDA);

    let conflicts = router.filter(focus, conflicts, |c| format!("{} {}", c.name, c.region));
    let mut news = router.filter(focus, news, |n| n.headline.clone());
    news.sort_by(by_tone_asc);
    news.truncate(15);
    let feed: Vec<FeedItem> = router
        .filter(focus, feed, |f| f.text.clone())
        .into_iter()
        .take(8)
        .collect();
    let posts: Vec<SocialPost> = social
        .into_iter()
        .filter(|p| post_categories.contains(&p.category) && router.matches(focus, &p.text))
        .take(8)
        .collect();
    let hostility: Vec<HostilityPair> = hostility
        .into_iter()
        .filter(|h| router.matches(focus, &h.country_a) || router.matches(focus, &h.country_b))
        .take(5)
        .collect();
    let propaganda: Vec<PropagandaEntry> =
        propaganda.into_iter().filter(propaganda_scope).collect();

    let mut out = Vec::new();
    push_block(&mut out, conflicts_label, conflict_json(&conflicts));
    push_block(&mut out, "REGIONAL NEWS", news_json(&news));
    push_block(&mut out, "LEADER STATEMENTS", feed_json(&feed));
    push_block(&mut out, "INTELLIGENCE POSTS", social_json(&posts));
    push_block(&mut out, "HOSTILITY INDICES", hostility_json(&hostility));
    push_block(&mut out, propaganda_label, propaganda_json(&propaganda));
    out
}

fn gather_domestic(cache: &SignalCache, router: &RegionalRouter) -> Vec<String> {
    let news: Vec<NewsItem> = fetch(cache, keys::NEWS);
    let feed: Vec<FeedItem> = fetch(cache, keys::FEED);
    let macros: Vec<MacroIndicator> = fetch(cache, keys::MACRO);
    let markets: Vec<MarketSection> = fetch(cache, keys::MARKETS);
    let econ: Vec<EconomicEvent> = fetch(cache, keys::ECONOMIC_CALENDAR);

    let mut news = router.filter(Focus::Domestic, news, |n| n.headline.clone());
    news.sort_by(by_tone_asc);
    news.truncate(15);
    let feed: Vec<FeedItem> = router
        .filter(Focus::Domestic, feed, |f| f.text.clone())
        .into_iter()
        .take(8)
        .collect();
    let high_impact: Vec<EconomicEvent> = econ
        .into_iter()
        .filter(|e| e.impact == Impact::High)
        .take(8)
        .collect();

    let mut out = Vec::new();
    push_block(&mut out, "DOMESTIC NEWS", news_json(&news));
    push_block(&mut out, "POLITICAL STATEMENTS", feed_json(&feed));
    push_block(
        &mut out,
        "ECONOMIC INDICATORS",
        macros
            .iter()
            .map(|m| json!({ "name": m.name, "value": m.value, "delta": m.delta }))
            .collect(),
    );
    push_block(&mut out, "MARKETS", markets_json(&markets));
    push_block(
        &mut out,
        "HIGH-IMPACT ECONOMIC EVENTS",
        high_impact
            .iter()
            .map(|e| {
                json!({
                    "name": e.name, "date": e.date, "actual": e.actual,
                    "forecast": e.forecast, "previous": e.previous,
                })
            })
            .collect(),
    );
    out
}

fn gather_argentina(cache: &SignalCache, router: &RegionalRouter) -> Vec<String> {
    let news: Vec<NewsItem> = fetch(cache, keys::NEWS);
    let feed: Vec<FeedItem> = fetch(cache, keys::FEED);
    let social: Vec<SocialPost> = fetch(cache, keys::SOCIAL);
    let markets: Vec<MarketSection> = fetch(cache, keys::MARKETS);
    let econ: Vec<EconomicEvent> = fetch(cache, keys::ECONOMIC_CALENDAR);

    let mut news = router.filter(Focus::Argentina, news, |n| n.headline.clone());
    news.sort_by(by_tone_asc);
    news.truncate(12);
    let feed: Vec<FeedItem> = router
        .filter(Focus::Argentina, feed, |f| f.text.clone())
        .into_iter()
        .take(8)
        .collect();
    let posts: Vec<SocialPost> = social
        .into_iter()
        .filter(|p| router.matches(Focus::Argentina, &p.text))
        .take(8)
        .collect();
    // Structural filter, not keyword: peso quotes are identified by their
    // currency field.
    let peso_quotes: Vec<&MarketQuote> = markets
        .iter()
        .flat_map(|s| s.items.iter())
        .filter(|q| q.currency.as_deref() == Some("ARS"))
        .collect();
    let ar_events: Vec<EconomicEvent> =
        econ.into_iter().filter(|e| e.country == "AR").take(8).collect();

    let mut out = Vec::new();
    push_block(&mut out, "ARGENTINA NEWS", news_json(&news));
    push_block(&mut out, "LEADER STATEMENTS", feed_json(&feed));
    push_block(&mut out, "SOCIAL POSTS", social_json(&posts));
    push_block(
        &mut out,
        "PESO QUOTES",
        peso_quotes
            .iter()
            .map(|q| json!({ "name": q.name, "price": q.price, "delta": q.delta }))
            .collect(),
    );
    push_block(
        &mut out,
        "ECONOMIC CALENDAR (AR)",
        ar_events
            .iter()
            .map(|e| {
                json!({
                    "name": e.name, "date": e.date, "impact": e.impact,
                    "actual": e.actual, "forecast": e.forecast,
                })
            })
            .collect(),
    );
    out
}

fn gather_intel(cache: &SignalCache) -> Vec<String> {
    let cyber: Vec<CyberThreat> = fetch(cache, keys::CYBER_THREATS);
    let propaganda: Vec<PropagandaEntry> = fetch(cache, keys::PROPAGANDA);
    let hostility: Vec<HostilityPair> = fetch(cache, keys::HOSTILITY);
    let social: Vec<SocialPost> = fetch(cache, keys::SOCIAL);
    let alerts: Vec<Alert> = fetch(cache, keys::ALERTS);

    let critical: Vec<CyberThreat> = cyber
        .into_iter()
        .filter(|c| c.severity >= Severity::High)
        .take(8)
        .collect();
    let posts: Vec<SocialPost> = social
        .into_iter()
        .filter(|p| {
            matches!(
                p.category,
                PostCategory::Military | PostCategory::Crisis | PostCategory::Osint
            )
        })
        .take(8)
        .collect();
    let flash: Vec<Alert> = alerts.into_iter().filter(|a| a.priority.is_urgent()).take(8).collect();

    let mut out = Vec::new();
    push_block(
        &mut out,
        "CYBER THREATS",
        critical
            .iter()
            .map(|c| {
                json!({
                    "name": c.name, "description": clip(&c.description, TEXT_CLIP),
                    "adversary": c.adversary, "targeted_countries": c.targeted_countries,
                    "severity": c.severity, "malware_families": c.malware_families,
                })
            })
            .collect(),
    );
    push_block(&mut out, "STATE MEDIA PROPAGANDA", propaganda_json(&propaganda));
    push_block(&mut out, "HOSTILITY INDEX", hostility_json(&hostility[..hostility.len().min(10)]));
    push_block(&mut out, "OSINT POSTS", social_json(&posts));
    push_block(
        &mut out,
        "ACTIVE ALERTS",
        flash
            .iter()
            .map(|a| json!({ "title": clip(&a.title, TEXT_CLIP), "priority": a.priority, "source": a.source }))
            .collect(),
    );
    out
}
