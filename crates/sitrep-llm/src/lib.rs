//! OpenRouter-backed implementation of the pipeline's completion client.
//!
//! One HTTP client, two model tiers: a primary model for full briefs and a
//! low-cost fallback tried when the primary fails or when the caller asks
//! for it outright with `prefer_small`. Which tier actually answered is
//! recorded per model and reported in the returned `Completion`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sitrep_core::{Completion, CompletionClient, CompletionOptions, Result, SitrepError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

const API_BASE: &str = "https://openrouter.ai/api/v1";
const PRIMARY_MODEL: &str = "anthropic/claude-3.5-sonnet";
const FALLBACK_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";

// OpenAI-compatible request/response shapes for OpenRouter
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageBody,
}

#[derive(Deserialize)]
struct ChatMessageBody {
    content: String,
}

pub struct OpenRouterClient {
    api_key: String,
    primary_model: String,
    fallback_model: String,
    http: reqwest::Client,
    usage: Mutex<HashMap<String, u64>>,
}

impl OpenRouterClient {
    /// Build a client from `OPENROUTER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();
        let key = key.trim();
        if key.is_empty() {
            return Err(SitrepError::MissingApiKey);
        }
        Ok(Self::new(key.to_string()))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            primary_model: PRIMARY_MODEL.to_string(),
            fallback_model: FALLBACK_MODEL.to_string(),
            http: reqwest::Client::new(),
            usage: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_models(mut self, primary: &str, fallback: &str) -> Self {
        self.primary_model = primary.to_string();
        self.fallback_model = fallback.to_string();
        self
    }

    /// How many completions each model has answered since startup.
    pub fn usage_counts(&self) -> HashMap<String, u64> {
        self.usage.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn record_use(&self, model: &str) {
        let mut usage = self.usage.lock().unwrap_or_else(|p| p.into_inner());
        *usage.entry(model.to_string()).or_insert(0) += 1;
    }

    /// Models to try, in order, for one completion call.
    fn tier_order(&self, prefer_small: bool) -> Vec<&str> {
        if prefer_small {
            vec![self.fallback_model.as_str()]
        } else {
            vec![self.primary_model.as_str(), self.fallback_model.as_str()]
        }
    }

    async fn request_one(
        &self,
        model: &str,
        instructions: &str,
        context: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let body = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage { role: "system", content: instructions.to_string() },
                ChatMessage { role: "user", content: context.to_string() },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", API_BASE))
            .timeout(options.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| SitrepError::Completion(format!("{} request failed: {}", model, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SitrepError::Completion(format!(
                "{} returned {}: {}",
                model, status, detail
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SitrepError::Completion(format!("{} response parse failed: {}", model, e)))?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => Err(SitrepError::Completion(format!("{} returned no choices", model))),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(
        &self,
        instructions: &str,
        context: &str,
        options: CompletionOptions,
    ) -> Result<Completion> {
        let start = Instant::now();
        let mut last_err = None;
        for model in self.tier_order(options.prefer_small) {
            match self.request_one(model, instructions, context, &options).await {
                Ok(text) => {
                    self.record_use(model);
                    return Ok(Completion {
                        text,
                        model: model.to_string(),
                        latency_ms: start.elapsed().as_millis() as u64,
                    });
                }
                Err(e) => {
                    log::warn!("completion via {} failed: {}", model, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| SitrepError::Completion("no completion tiers configured".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_order_tries_primary_then_fallback() {
        let client = OpenRouterClient::new("k".into());
        assert_eq!(client.tier_order(false), vec![PRIMARY_MODEL, FALLBACK_MODEL]);
    }

    #[test]
    fn prefer_small_skips_the_primary_tier() {
        let client = OpenRouterClient::new("k".into());
        assert_eq!(client.tier_order(true), vec![FALLBACK_MODEL]);
    }

    #[test]
    fn with_models_overrides_both_tiers() {
        let client = OpenRouterClient::new("k".into()).with_models("a/big", "b/small");
        assert_eq!(client.tier_order(false), vec!["a/big", "b/small"]);
    }

    #[test]
    fn usage_counts_accumulate_per_model() {
        let client = OpenRouterClient::new("k".into());
        client.record_use("a/big");
        client.record_use("a/big");
        client.record_use("b/small");
        let counts = client.usage_counts();
        assert_eq!(counts.get("a/big"), Some(&2));
        assert_eq!(counts.get("b/small"), Some(&1));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        std::env::set_var("OPENROUTER_API_KEY", "   ");
        let result = OpenRouterClient::from_env();
        assert!(matches!(result, Err(SitrepError::MissingApiKey)));
        std::env::remove_var("OPENROUTER_API_KEY");
    }
}
