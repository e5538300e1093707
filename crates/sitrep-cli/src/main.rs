//! Operator CLI: load a signal snapshot into the cache, run one of the
//! generation operations, print the resulting HTML on stdout.
//!
//! The snapshot is a JSON object mapping cache keys to their collections,
//! e.g. `{"news": [...], "conflicts": [...], "trends": {...}}`, typically
//! a dump taken from the collector service's store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitrep_core::{BriefConfig, BriefOrchestrator, Focus, SignalCache};
use sitrep_llm::OpenRouterClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "sitrep")]
#[command(about = "Generate OSINT situation-report briefs from a cached signal snapshot")]
struct Cli {
    /// Path to a JSON snapshot of cached signal collections
    #[arg(long, env = "SITREP_SNAPSHOT")]
    snapshot: PathBuf,

    /// Freshness window applied to every loaded collection, in seconds
    #[arg(long, env = "SITREP_SIGNAL_TTL", default_value = "3600")]
    signal_ttl_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single desk's brief
    Desk {
        /// Desk focus: global, mideast, ukraine, domestic, argentina, intel
        focus: String,
    },
    /// Generate all desk briefs plus the unified synthesis
    All,
    /// Generate an on-demand surge brief for a keyword
    Surge { keyword: String },
}

fn load_snapshot(cache: &SignalCache, path: &PathBuf, ttl: Duration) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&raw).context("snapshot must be a JSON object of key -> value")?;
    let count = snapshot.len();
    for (key, value) in snapshot {
        cache.set(&key, &value, ttl);
    }
    Ok(count)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cache = Arc::new(SignalCache::new());
    let loaded = load_snapshot(&cache, &cli.snapshot, Duration::from_secs(cli.signal_ttl_secs))?;
    log::info!("loaded {} collections from {}", loaded, cli.snapshot.display());

    let client = Arc::new(OpenRouterClient::from_env()?);
    let orchestrator = BriefOrchestrator::new(cache, client.clone(), BriefConfig::default());

    match cli.command {
        Command::Desk { focus } => {
            let focus = Focus::parse_or_global(&focus);
            let brief = orchestrator.fetch_brief(Some(focus)).await?;
            eprintln!(
                "# {} desk | model {} | confidence {:?} | sources: {}",
                focus.as_str(),
                brief.model,
                brief.confidence,
                brief.sources.join(", ")
            );
            println!("{}", brief.html);
        }
        Command::All => {
            let report = orchestrator.generate_all_briefs().await;
            for focus in &report.generated {
                eprintln!("ok   {}", focus.as_str());
            }
            for focus in &report.failed {
                eprintln!("FAIL {}", focus.as_str());
            }
            eprintln!("unified: {}", if report.unified { "written" } else { "skipped" });
            if report.generated.is_empty() {
                anyhow::bail!("every desk failed");
            }
        }
        Command::Surge { keyword } => {
            let brief = orchestrator.generate_surge_brief(&keyword).await?;
            eprintln!("# surge '{}' | model {}", keyword, brief.model);
            println!("{}", brief.html);
        }
    }

    let usage = client.usage_counts();
    if !usage.is_empty() {
        log::info!("model usage: {:?}", usage);
    }
    Ok(())
}
