//! Contract for the language-model completion service.
//!
//! The pipeline consumes exactly one call shape; transport, provider choice,
//! and fallback tiers live behind this trait (see the `sitrep-llm` crate).

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Generation options recognized by every completion backend.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Output-size cap. Bounds both cost and latency.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Hint to use a low-cost model. Not used by the brief pipeline itself,
    /// but part of the shared contract surface (ticker summarizer et al.).
    pub prefer_small: bool,
    /// Client-side wait bound. A timeout surfaces as an ordinary
    /// completion failure, not a distinguished case.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.3,
            prefer_small: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Generated text plus provenance metadata.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    /// Which model actually produced the text.
    pub model: String,
    pub latency_ms: u64,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one generation: `instructions` is the desk persona (system
    /// prompt), `context` the gathered signal block.
    async fn complete(
        &self,
        instructions: &str,
        context: &str,
        options: CompletionOptions,
    ) -> Result<Completion>;
}
