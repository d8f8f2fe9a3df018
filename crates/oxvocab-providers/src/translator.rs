//! Translator built on an [`LlmProvider`].
//!
//! Each lookup first consults an in-memory cache, then asks the provider with
//! exponential backoff between attempts. When every attempt fails the
//! built-in dictionary is tried before giving up.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use oxvocab_core::meanings::parse_meanings;
use oxvocab_core::traits::{CacheStats, ChatRequest, LlmProvider, Translator};

use crate::error::{ProviderError, TranslateError};
use crate::fallback;

pub const DEFAULT_TARGET_LANGUAGE: &str = "Indonesian";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);
/// Pause between requests of a batch.
pub const BATCH_PAUSE: Duration = Duration::from_millis(500);

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.3;

type CacheKey = (String, String);

/// LLM-backed translator with retry, cache and fallback dictionary.
pub struct LlmTranslator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    target_language: String,
    max_retries: u32,
    retry_delay: Duration,
    cache: Mutex<HashMap<CacheKey, Vec<String>>>,
}

impl LlmTranslator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    /// At least one attempt is always made.
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The user prompt sent for one word.
    pub fn prompt(&self, word: &str, class: &str) -> String {
        let language = &self.target_language;
        format!(
            "Translate the English word \"{word}\" (as a {class}) into {language}.\n\
             Provide all possible meanings in different contexts, separated by commas.\n\
             Return ONLY a list of {language} meanings without explanation or additional text.\n\
             Focus on the most common and useful meanings.\n\
             \n\
             Word: {word}\n\
             Class: {class}\n\
             {language} meanings:"
        )
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a professional English-{} translator. \
             Provide accurate, contextual translations without explanations.",
            self.target_language
        )
    }

    /// Delay before the attempt following `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<CacheKey, Vec<String>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fallback(&self, word: &str) -> Option<Vec<String>> {
        if self.target_language.eq_ignore_ascii_case(DEFAULT_TARGET_LANGUAGE) {
            fallback::lookup(word)
        } else {
            None
        }
    }

    /// Translate several words, pausing between requests. Words that cannot
    /// be translated are left out of the result.
    pub async fn batch_translate(
        &self,
        words: &[(String, String)],
    ) -> HashMap<String, Vec<String>> {
        let mut translations = HashMap::new();
        info!("starting batch translation of {} words", words.len());

        for (i, (word, class)) in words.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
            debug!("batch progress {}/{}: '{word}'", i + 1, words.len());
            match self.translate(word, class).await {
                Ok(meanings) => {
                    translations.insert(word.clone(), meanings);
                }
                Err(e) => warn!("{e:#}"),
            }
        }

        info!("batch translation completed: {} words", translations.len());
        translations
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, word: &str, class: &str) -> anyhow::Result<Vec<String>> {
        let key = (word.to_lowercase(), class.to_lowercase());
        if let Some(meanings) = self.cache().get(&key) {
            debug!("using cached translation for '{word}'");
            return Ok(meanings.clone());
        }

        let request = ChatRequest {
            model: self.model.clone(),
            system_prompt: self.system_prompt(),
            prompt: self.prompt(word, class),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut attempts = 0;
        let mut last_error = String::from("no attempt made");

        for attempt in 0..self.max_retries {
            attempts += 1;
            debug!(
                "translating '{word}' (attempt {}/{})",
                attempt + 1,
                self.max_retries
            );

            let mut retry_after = None;
            match self.provider.complete(&request).await {
                Ok(response) => {
                    let meanings = parse_meanings(&response.content);
                    if !meanings.is_empty() {
                        info!("translated '{word}' with {} meanings", meanings.len());
                        self.cache().insert(key, meanings.clone());
                        return Ok(meanings);
                    }
                    warn!("empty translation received for '{word}'");
                    last_error = "empty translation".to_string();
                }
                Err(e) => {
                    warn!("translation attempt {} failed: {e:#}", attempt + 1);
                    last_error = format!("{e:#}");
                    let provider_error = e.downcast_ref::<ProviderError>();
                    if provider_error.is_some_and(ProviderError::is_permanent) {
                        break;
                    }
                    retry_after = provider_error.and_then(ProviderError::retry_after_ms);
                }
            }

            if attempt + 1 < self.max_retries {
                let wait = retry_after
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| self.backoff(attempt))
                    .min(MAX_BACKOFF);
                debug!("waiting {wait:?} before retry");
                tokio::time::sleep(wait).await;
            }
        }

        if let Some(meanings) = self.fallback(word) {
            warn!("using fallback translation for '{word}'");
            return Ok(meanings);
        }

        Err(TranslateError::Exhausted {
            word: word.to_string(),
            attempts,
            last_error,
        }
        .into())
    }

    fn clear_cache(&self) {
        self.cache().clear();
        info!("translation cache cleared");
    }

    fn cache_stats(&self) -> CacheStats {
        let cache = self.cache();
        let mut cached_words: Vec<String> = cache
            .keys()
            .map(|(word, class)| format!("{word}/{class}"))
            .collect();
        cached_words.sort();
        CacheStats {
            cache_size: cache.len(),
            cached_words,
        }
    }
}
