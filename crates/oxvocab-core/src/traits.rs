//! Core trait definitions for LLM providers and translators.
//!
//! `LlmProvider` is implemented by the `oxvocab-providers` crate for each chat
//! backend. `Translator` is what the driving loop calls: it hands back a
//! resolved list of candidate meanings and hides transport, retries, and
//! caching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for chat-completion backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "groq").
    fn name(&self) -> &str;

    /// Send one system + user exchange and return the assistant reply.
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse>;

    /// List models known to work with this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// A single-turn chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "llama-3.1-8b-instant").
    pub model: String,
    /// System prompt.
    pub system_prompt: String,
    /// User prompt.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Reply to a [`ChatRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Raw assistant text.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Resolves an English word into candidate target-language meanings.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Candidate meanings for `word` used as `class`.
    ///
    /// An error or an empty list means no meanings are available and the
    /// word should be skipped.
    async fn translate(&self, word: &str, class: &str) -> anyhow::Result<Vec<String>>;

    /// Drop every cached translation.
    fn clear_cache(&self);

    /// Snapshot of the translation cache.
    fn cache_stats(&self) -> CacheStats;
}

/// Translation cache snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub cache_size: usize,
    /// Cached `word/class` pairs, sorted.
    pub cached_words: Vec<String>,
}
