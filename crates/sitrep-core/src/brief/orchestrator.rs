//! The three brief-generation operations.
//!
//! Every write path is replace-or-noop: a cache key is only ever overwritten
//! by a successful generation, so the worst user-visible outcome of any
//! failure is a stale-but-present brief, never a blank one.

use crate::brief::config::BriefConfig;
use crate::brief::desks::{self, SURGE_PERSONA, SYNTHESIS_PERSONA};
use crate::brief::gather::{self, gather};
use crate::brief::trends::trends_context;
use crate::cache::SignalCache;
use crate::client::{CompletionClient, CompletionOptions};
use crate::confidence;
use crate::error::Result;
use crate::sanitize::sanitize;
use crate::types::{keys, Brief, Conflict, FeedItem, Focus, NewsItem, PropagandaEntry, SocialPost};
use chrono::Utc;
use futures::future::join_all;
use regex::RegexBuilder;
use std::sync::Arc;

/// Substituted when the completion client returns no usable text.
const EMPTY_GENERATION_PLACEHOLDER: &str = "<p>Brief generation failed</p>";

/// Attribution for surge briefs: only the collections they consult.
const SURGE_SOURCES: [&str; 4] = ["X/Twitter", "GDELT", "Leader Feeds", "ACLED"];

/// Outcome of an all-focus generation cycle.
#[derive(Debug)]
pub struct AllBriefsReport {
    pub generated: Vec<Focus>,
    pub failed: Vec<Focus>,
    /// Whether the unified synthesis was written.
    pub unified: bool,
}

pub struct BriefOrchestrator {
    cache: Arc<SignalCache>,
    client: Arc<dyn CompletionClient>,
    config: BriefConfig,
}

impl BriefOrchestrator {
    pub fn new(cache: Arc<SignalCache>, client: Arc<dyn CompletionClient>, config: BriefConfig) -> Self {
        Self { cache, client, config }
    }

    fn options(&self, max_tokens: u32) -> CompletionOptions {
        CompletionOptions {
            max_tokens,
            temperature: self.config.temperature,
            prefer_small: false,
            timeout: self.config.completion_timeout,
        }
    }

    /// Text that is allowed into a brief: sanitized completion output, or the
    /// sanitized placeholder when the client returned nothing usable.
    fn usable_html(text: &str) -> String {
        if text.trim().is_empty() {
            sanitize(EMPTY_GENERATION_PLACEHOLDER)
        } else {
            sanitize(text)
        }
    }

    /// Generate one desk's brief and replace its cache entry.
    ///
    /// A completion failure propagates without touching the cache, leaving
    /// any previous brief as the last-known-good value.
    pub async fn fetch_brief(&self, focus: Option<Focus>) -> Result<Brief> {
        let focus = focus.unwrap_or(Focus::Global);
        let spec = desks::desk(focus);
        log::info!("generating {} brief", focus.as_str());

        let mut context = gather(&self.cache, &self.config.router, focus);
        let trends = trends_context(&self.cache, &self.config, focus);
        if !trends.is_empty() {
            context.push_str("\n\n");
            context.push_str(&trends);
        }

        let completion = self
            .client
            .complete(
                spec.persona,
                &format!("Generate intelligence brief based on this data:\n\n{}", context),
                self.options(self.config.brief_max_tokens),
            )
            .await?;

        let brief = Brief {
            html: Self::usable_html(&completion.text),
            generated_at: Utc::now(),
            model: completion.model,
            sources: spec.sources.iter().map(|s| s.to_string()).collect(),
            confidence: Some(confidence::score(&self.cache, self.config.weights)),
        };

        self.cache
            .set_with_backing(
                &focus.cache_key(),
                &brief,
                self.config.brief_ttl,
                self.config.brief_retention,
            )
            .await;
        log::info!(
            "{} brief cached ({} ms, model {})",
            focus.as_str(),
            completion.latency_ms,
            brief.model
        );
        Ok(brief)
    }

    /// Generate every desk's brief concurrently, then merge the successful
    /// outputs into one unified brief under the default key.
    ///
    /// Per-desk failures are isolated: one desk failing neither blocks nor
    /// fails the others, and the synthesis proceeds with whatever subset
    /// succeeded. A synthesis failure is logged only; the previous unified
    /// brief stays authoritative.
    pub async fn generate_all_briefs(&self) -> AllBriefsReport {
        let outcomes = join_all(
            Focus::ALL
                .iter()
                .map(|f| async move { (*f, self.fetch_brief(Some(*f)).await) }),
        )
        .await;

        let mut generated = Vec::new();
        let mut failed = Vec::new();
        let mut desk_reports: Vec<(Focus, Brief)> = Vec::new();
        for (focus, outcome) in outcomes {
            match outcome {
                Ok(brief) => {
                    generated.push(focus);
                    desk_reports.push((focus, brief));
                }
                Err(e) => {
                    log::warn!("{} desk failed: {}", focus.as_str(), e);
                    failed.push(focus);
                }
            }
        }

        if desk_reports.is_empty() {
            log::warn!("no desk reports to merge; skipping unified synthesis");
            return AllBriefsReport { generated, failed, unified: false };
        }

        let unified = match self.synthesize(&desk_reports).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("unified synthesis failed, previous brief stands: {}", e);
                false
            }
        };

        AllBriefsReport { generated, failed, unified }
    }

    async fn synthesize(&self, desk_reports: &[(Focus, Brief)]) -> Result<()> {
        let mut context = String::new();
        for (focus, brief) in desk_reports {
            context.push_str(&format!(
                "=== {} DESK REPORT ===\n{}\n\n",
                focus.as_str().to_ascii_uppercase(),
                brief.html
            ));
        }
        // The synthesis also sees the raw propaganda digest, not just the
        // desks' readings of it, for the cross-reference section.
        let propaganda: Vec<PropagandaEntry> =
            self.cache.get(keys::PROPAGANDA).unwrap_or_default();
        context.push_str(&format!(
            "PROPAGANDA NARRATIVE DIGEST: {}\n\nCurrent UTC: {}",
            serde_json::to_value(&propaganda)?,
            Utc::now().to_rfc3339()
        ));

        let completion = self
            .client
            .complete(
                SYNTHESIS_PERSONA,
                &format!("Merge these desk reports into one unified situation report:\n\n{}", context),
                self.options(self.config.synthesis_max_tokens),
            )
            .await?;

        let mut sources = vec!["All Desks".to_string()];
        for (focus, _) in desk_reports {
            for label in desks::desk(*focus).sources {
                if !sources.iter().any(|s| s == label) {
                    sources.push(label.to_string());
                }
            }
        }

        let brief = Brief {
            html: Self::usable_html(&completion.text),
            generated_at: Utc::now(),
            model: completion.model,
            sources,
            confidence: Some(confidence::score(&self.cache, self.config.weights)),
        };

        self.cache
            .set_with_backing(
                keys::BRIEF,
                &brief,
                self.config.brief_ttl,
                self.config.brief_retention,
            )
            .await;
        log::info!("unified brief cached ({} desks merged)", desk_reports.len());
        Ok(())
    }

    /// On-demand report on a sudden surge in mentions of `keyword`.
    ///
    /// The keyword is untrusted caller input: it is regex-escaped and matched
    /// literally (case-insensitive). No confidence score: the keyword-scoped
    /// input set is not a cross-section of all tracked signal.
    pub async fn generate_surge_brief(&self, keyword: &str) -> Result<Brief> {
        let keyword = keyword.trim();
        // Escaped literals always compile; the builder only sets flags.
        let pattern = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("escaped keyword must compile: {}", e));
        log::info!("generating surge brief for '{}'", keyword);

        let social: Vec<SocialPost> = self.cache.get(keys::SOCIAL).unwrap_or_default();
        let news: Vec<NewsItem> = self.cache.get(keys::NEWS).unwrap_or_default();
        let feed: Vec<FeedItem> = self.cache.get(keys::FEED).unwrap_or_default();
        let conflicts: Vec<Conflict> = self.cache.get(keys::CONFLICTS).unwrap_or_default();

        let social: Vec<SocialPost> =
            social.into_iter().filter(|p| pattern.is_match(&p.text)).take(8).collect();
        let news: Vec<NewsItem> =
            news.into_iter().filter(|n| pattern.is_match(&n.headline)).take(10).collect();
        let feed: Vec<FeedItem> =
            feed.into_iter().filter(|f| pattern.is_match(&f.text)).take(6).collect();
        let conflicts: Vec<Conflict> = conflicts
            .into_iter()
            .filter(|c| pattern.is_match(&c.name) || pattern.is_match(&c.region))
            .take(5)
            .collect();

        let mut blocks = Vec::new();
        blocks.push(format!("SURGE KEYWORD: {}", keyword));
        gather::push_block(&mut blocks, "MATCHED SOCIAL POSTS", gather::social_json(&social));
        gather::push_block(&mut blocks, "MATCHED NEWS", gather::news_json(&news));
        gather::push_block(&mut blocks, "MATCHED LEADER STATEMENTS", gather::feed_json(&feed));
        gather::push_block(&mut blocks, "MATCHED CONFLICTS", gather::conflict_json(&conflicts));
        blocks.push(format!("Current UTC: {}", Utc::now().to_rfc3339()));
        let context = blocks.join("\n\n");

        let completion = self
            .client
            .complete(
                SURGE_PERSONA,
                &format!(
                    "Mentions of \"{}\" are surging across monitored feeds. Explain the most likely cause based on this data:\n\n{}",
                    keyword, context
                ),
                self.options(self.config.surge_max_tokens),
            )
            .await?;

        let brief = Brief {
            html: Self::usable_html(&completion.text),
            generated_at: Utc::now(),
            model: completion.model,
            sources: SURGE_SOURCES.iter().map(|s| s.to_string()).collect(),
            confidence: None,
        };

        self.cache
            .set_with_backing(
                keys::BRIEF_EMERGENCY,
                &brief,
                self.config.surge_ttl,
                self.config.surge_retention,
            )
            .await;
        log::info!("surge brief cached for '{}'", keyword);
        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Completion;
    use crate::error::SitrepError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(3600);

    /// Scripted completion client: records every call, fails when the
    /// persona contains a marker, and otherwise answers per persona.
    #[derive(Default)]
    struct MockClient {
        fail_markers: Vec<&'static str>,
        return_empty: bool,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockClient {
        fn failing_for(marker: &'static str) -> Self {
            Self { fail_markers: vec![marker], ..Default::default() }
        }

        fn contexts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, ctx)| ctx.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(
            &self,
            instructions: &str,
            context: &str,
            _options: CompletionOptions,
        ) -> Result<Completion> {
            self.calls
                .lock()
                .unwrap()
                .push((instructions.to_string(), context.to_string()));
            for marker in &self.fail_markers {
                if instructions.contains(marker) {
                    return Err(SitrepError::Completion("scripted failure".into()));
                }
            }
            let text = if self.return_empty {
                String::new()
            } else if instructions.contains("WATCH OFFICER") {
                "<p>unified report</p>".to_string()
            } else {
                "<p>desk report</p>".to_string()
            };
            Ok(Completion { text, model: "mock-model".into(), latency_ms: 5 })
        }
    }

    fn orchestrator(client: MockClient) -> (Arc<SignalCache>, Arc<MockClient>, BriefOrchestrator) {
        let cache = Arc::new(SignalCache::new());
        let client = Arc::new(client);
        let orch = BriefOrchestrator::new(cache.clone(), client.clone(), BriefConfig::default());
        (cache, client, orch)
    }

    fn stale_brief(html: &str) -> Brief {
        Brief {
            html: html.into(),
            generated_at: Utc::now(),
            model: "old-model".into(),
            sources: vec![],
            confidence: Some(50),
        }
    }

    #[tokio::test]
    async fn fetch_brief_writes_exactly_one_focus_key() {
        let (cache, _, orch) = orchestrator(MockClient::default());
        let brief = orch.fetch_brief(Some(Focus::Mideast)).await.unwrap();

        assert_eq!(brief.html, "<p>desk report</p>");
        assert!(cache.has("brief:mideast"));
        for focus in Focus::ALL {
            if focus != Focus::Mideast {
                assert!(!cache.has(&focus.cache_key()), "{:?} key touched", focus);
            }
        }
        assert!(!cache.has(keys::BRIEF_EMERGENCY));
    }

    #[tokio::test]
    async fn unspecified_focus_defaults_to_global_key() {
        let (cache, _, orch) = orchestrator(MockClient::default());
        orch.fetch_brief(None).await.unwrap();
        assert!(cache.has("brief"));
    }

    #[tokio::test]
    async fn completion_failure_leaves_previous_brief_untouched() {
        let (cache, _, orch) = orchestrator(MockClient::failing_for("ARGUS INTEL DESK"));
        cache.set(&Focus::Intel.cache_key(), &stale_brief("<p>old intel</p>"), TTL);

        let result = orch.fetch_brief(Some(Focus::Intel)).await;
        assert!(result.is_err());

        let kept: Brief = cache.get(&Focus::Intel.cache_key()).unwrap();
        assert_eq!(kept.html, "<p>old intel</p>");
    }

    #[tokio::test]
    async fn empty_completion_substitutes_placeholder() {
        let (_, _, orch) = orchestrator(MockClient {
            return_empty: true,
            ..Default::default()
        });
        let brief = orch.fetch_brief(Some(Focus::Global)).await.unwrap();
        assert_eq!(brief.html, "<p>Brief generation failed</p>");
    }

    #[tokio::test]
    async fn missing_collections_lower_confidence_but_never_fail() {
        let (cache, _, orch) = orchestrator(MockClient::default());
        // Everything weighted is fresh except propaganda and news, which are
        // absent entirely
        for (key, _) in crate::confidence::DEFAULT_WEIGHTS {
            if key != keys::PROPAGANDA && key != keys::NEWS {
                cache.set(key, &serde_json::json!([]), TTL);
            }
        }
        let brief = orch.fetch_brief(Some(Focus::Intel)).await.unwrap();
        // 100 minus news (20) minus propaganda (10)
        assert_eq!(brief.confidence, Some(70));
    }

    #[tokio::test]
    async fn generated_markup_is_sanitized_before_caching() {
        #[derive(Default)]
        struct HostileClient;
        #[async_trait]
        impl CompletionClient for HostileClient {
            async fn complete(&self, _: &str, _: &str, _: CompletionOptions) -> Result<Completion> {
                Ok(Completion {
                    text: r#"<h2>ok</h2><script>steal()</script><p onclick="x">body</p>"#.into(),
                    model: "mock-model".into(),
                    latency_ms: 1,
                })
            }
        }
        let cache = Arc::new(SignalCache::new());
        let orch = BriefOrchestrator::new(cache.clone(), Arc::new(HostileClient), BriefConfig::default());
        orch.fetch_brief(None).await.unwrap();

        let cached: Brief = cache.get("brief").unwrap();
        assert_eq!(cached.html, "<h2>ok</h2>steal()<p>body</p>");
    }

    #[tokio::test]
    async fn all_briefs_isolates_a_single_desk_failure() {
        let (cache, _, orch) = orchestrator(MockClient::failing_for("ARGUS UKRAINE DESK"));
        cache.set(&Focus::Ukraine.cache_key(), &stale_brief("<p>old ukraine</p>"), TTL);

        let report = orch.generate_all_briefs().await;

        assert_eq!(report.failed, vec![Focus::Ukraine]);
        assert_eq!(report.generated.len(), 5);
        assert!(report.unified);

        // The failing desk's previous brief is untouched
        let kept: Brief = cache.get(&Focus::Ukraine.cache_key()).unwrap();
        assert_eq!(kept.html, "<p>old ukraine</p>");

        // The unified brief landed on the default key with merged attribution
        let unified: Brief = cache.get(keys::BRIEF).unwrap();
        assert_eq!(unified.html, "<p>unified report</p>");
        assert_eq!(unified.sources[0], "All Desks");
        assert!(unified.sources.iter().any(|s| s == "Cyber OTX"));
        // The failed desk's exclusive label is not claimed
        assert!(!unified.sources.iter().any(|s| s == "RU Propaganda"));
    }

    #[tokio::test]
    async fn synthesis_failure_is_absorbed_and_desk_briefs_stand() {
        let (cache, _, orch) = orchestrator(MockClient::failing_for("WATCH OFFICER"));
        let report = orch.generate_all_briefs().await;

        assert!(!report.unified);
        assert_eq!(report.generated.len(), 6);
        // Desk writes are all present; the default key holds the global
        // desk's own brief, not a unified one
        let global: Brief = cache.get(keys::BRIEF).unwrap();
        assert_eq!(global.html, "<p>desk report</p>");
        assert!(cache.has("brief:argentina"));
    }

    #[tokio::test]
    async fn all_desks_failing_skips_synthesis() {
        let (cache, client, orch) = orchestrator(MockClient::failing_for("ARGUS"));
        let report = orch.generate_all_briefs().await;
        assert_eq!(report.generated.len(), 0);
        assert_eq!(report.failed.len(), 6);
        assert!(!report.unified);
        assert!(!cache.has(keys::BRIEF));
        // Six desk calls, no synthesis call
        assert_eq!(client.calls.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn surge_brief_escapes_regex_metacharacters() {
        let (cache, client, orch) = orchestrator(MockClient::default());
        cache.set(
            keys::NEWS,
            &vec![
                NewsItem { headline: "F-16 transfer announced".into(), tone: -2.0, source: "GDELT".into() },
                Extra::headline("F16 without the dash"),
                Extra::headline("unrelated story"),
            ],
            TTL,
        );

        let brief = orch.generate_surge_brief("F-16").await.unwrap();
        assert!(brief.confidence.is_none());
        assert!(cache.has(keys::BRIEF_EMERGENCY));

        let contexts = client.contexts();
        let ctx = contexts.last().unwrap();
        assert!(ctx.contains("F-16 transfer announced"));
        assert!(!ctx.contains("F16 without the dash"));
        assert!(!ctx.contains("unrelated story"));
    }

    #[tokio::test]
    async fn surge_wildcard_keyword_matches_only_literally() {
        let (cache, client, orch) = orchestrator(MockClient::default());
        cache.set(
            keys::NEWS,
            &vec![
                Extra::headline("the token .* appeared verbatim"),
                Extra::headline("would match any regex"),
            ],
            TTL,
        );

        orch.generate_surge_brief(".*").await.unwrap();
        let contexts = client.contexts();
        let ctx = contexts.last().unwrap();
        assert!(ctx.contains("appeared verbatim"));
        assert!(!ctx.contains("would match any regex"));
    }

    #[tokio::test]
    async fn surge_uses_narrow_source_labels_and_short_ttl_key() {
        let (cache, _, orch) = orchestrator(MockClient::default());
        let brief = orch.generate_surge_brief("blackout").await.unwrap();
        assert_eq!(brief.sources, SURGE_SOURCES.to_vec());
        // Surge output never lands on a desk key
        for focus in Focus::ALL {
            assert!(!cache.has(&focus.cache_key()));
        }
    }

    /// Helper for building filler news items.
    struct Extra;
    impl Extra {
        fn headline(h: &str) -> NewsItem {
            NewsItem { headline: h.into(), tone: 0.0, source: "GDELT".into() }
        }
    }
}
