//! Quiz configuration and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use oxvocab_core::traits::LlmProvider;

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::translator::LlmTranslator;

pub const CONFIG_FILE: &str = "oxvocab.toml";
pub const GROQ_PROVIDER: &str = "groq";

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Any OpenAI-compatible endpoint; Groq when `base_url` is unset.
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Whether the provider has what it needs to make a request.
    pub fn has_credentials(&self) -> bool {
        match self {
            ProviderConfig::OpenAI { api_key, .. } => {
                !api_key.trim().is_empty() && api_key != "your_groq_api_key_here"
            }
            ProviderConfig::Ollama { .. } => true,
        }
    }
}

fn default_ollama_url() -> String {
    crate::ollama::DEFAULT_BASE_URL.to_string()
}

/// Top-level oxvocab configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for translations.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used for translations.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Language the learner answers in.
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// Attempts per translation.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Base delay between attempts in milliseconds, doubled each retry.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// HTTP timeout per request in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Vocabulary CSV.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Directory for weights, scores and history.
    #[serde(default = "default_scores_dir")]
    pub scores_dir: PathBuf,
}

fn default_provider() -> String {
    GROQ_PROVIDER.to_string()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}
fn default_target_language() -> String {
    crate::translator::DEFAULT_TARGET_LANGUAGE.to_string()
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_timeout() -> u64 {
    crate::openai::DEFAULT_TIMEOUT_SECS
}
fn default_data_file() -> PathBuf {
    PathBuf::from("data/oxford_5000.csv")
}
fn default_scores_dir() -> PathBuf {
    PathBuf::from("scores")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            target_language: default_target_language(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            timeout_secs: default_timeout(),
            data_file: default_data_file(),
            scores_dir: default_scores_dir(),
        }
    }
}

impl QuizConfig {
    /// Configuration of the default provider.
    pub fn provider_config(&self) -> Result<&ProviderConfig> {
        let name = &self.default_provider;
        self.providers.get(name).with_context(|| {
            format!(
                "provider '{name}' is not configured; \
                 set GROQ_API_KEY or add [providers.{name}] to {CONFIG_FILE}"
            )
        })
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Build the translator for the default provider and model.
    pub fn build_translator(&self) -> Result<LlmTranslator> {
        let provider = create_provider(self.provider_config()?, self.timeout_secs)?;
        Ok(LlmTranslator::new(provider, self.default_model.clone())
            .with_target_language(self.target_language.clone())
            .with_retries(self.max_retries, self.retry_delay()))
    }

    /// Starter configuration file contents.
    pub fn template() -> String {
        format!(
            r#"# oxvocab configuration
default_provider = "{GROQ_PROVIDER}"
default_model = "{model}"
target_language = "{language}"
max_retries = {retries}
retry_delay_ms = {delay}
timeout_secs = {timeout}
data_file = "{data}"
scores_dir = "{scores}"

[providers.groq]
type = "openai"
api_key = "${{GROQ_API_KEY}}"

# [providers.ollama]
# type = "ollama"
# base_url = "http://localhost:11434"
"#,
            model = default_model(),
            language = default_target_language(),
            retries = default_retries(),
            delay = default_retry_delay(),
            timeout = default_timeout(),
            data = default_data_file().display(),
            scores = default_scores_dir().display(),
        )
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI { api_key, base_url } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `oxvocab.toml` in the current directory
/// 2. `~/.config/oxvocab/config.toml`
///
/// Environment variable overrides: `GROQ_API_KEY`, `OXVOCAB_MAX_RETRIES`,
/// `OXVOCAB_TRANSLATION_TIMEOUT`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn apply_env_overrides(config: &mut QuizConfig) -> Result<()> {
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        let entry = config
            .providers
            .entry(GROQ_PROVIDER.into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(value) = std::env::var("OXVOCAB_MAX_RETRIES") {
        config.max_retries = value
            .trim()
            .parse()
            .with_context(|| format!("invalid OXVOCAB_MAX_RETRIES: {value}"))?;
    }

    if let Ok(value) = std::env::var("OXVOCAB_TRANSLATION_TIMEOUT") {
        config.timeout_secs = value
            .trim()
            .parse()
            .with_context(|| format!("invalid OXVOCAB_TRANSLATION_TIMEOUT: {value}"))?;
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("oxvocab"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig, timeout_secs: u64) -> Result<Arc<dyn LlmProvider>> {
    match config {
        ProviderConfig::OpenAI { api_key, base_url } => Ok(Arc::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            timeout_secs,
        )?)),
        ProviderConfig::Ollama { base_url } => Ok(Arc::new(OllamaProvider::with_timeout(
            base_url,
            timeout_secs,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_OXVOCAB_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_OXVOCAB_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_OXVOCAB_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_OXVOCAB_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.default_provider, "groq");
        assert_eq!(config.default_model, "llama-3.1-8b-instant");
        assert_eq!(config.target_language, "Indonesian");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "local"
default_model = "llama3.1:8b"
scores_dir = "/tmp/oxvocab"

[providers.groq]
type = "openai"
api_key = "gsk-test"

[providers.local]
type = "ollama"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.provider_config().unwrap(),
            ProviderConfig::Ollama { base_url } if base_url == "http://localhost:11434"
        ));
        assert_eq!(config.scores_dir, PathBuf::from("/tmp/oxvocab"));
        assert_eq!(config.retry_delay_ms, 1000);
    }

    #[test]
    fn template_parses_back() {
        let config: QuizConfig = toml::from_str(&QuizConfig::template()).unwrap();
        assert_eq!(config.default_provider, "groq");
        assert!(matches!(
            config.providers.get("groq"),
            Some(ProviderConfig::OpenAI { api_key, .. }) if api_key == "${GROQ_API_KEY}"
        ));
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/oxvocab.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_resolves_env_vars() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("oxvocab.toml");
        std::fs::write(
            &path,
            r#"
default_provider = "custom"

[providers.custom]
type = "openai"
api_key = "${_OXVOCAB_CUSTOM_KEY}"
base_url = "http://localhost:8080"
"#,
        )
        .unwrap();
        std::env::set_var("_OXVOCAB_CUSTOM_KEY", "sk-local");

        let config = load_config_from(Some(&path)).unwrap();
        assert!(matches!(
            config.provider_config().unwrap(),
            ProviderConfig::OpenAI { api_key, .. } if api_key == "sk-local"
        ));
        std::env::remove_var("_OXVOCAB_CUSTOM_KEY");
    }

    #[test]
    fn missing_provider_is_error() {
        let config = QuizConfig {
            default_provider: "nowhere".into(),
            ..QuizConfig::default()
        };
        let err = config.provider_config().unwrap_err();
        assert!(err.to_string().contains("provider 'nowhere' is not configured"));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::OpenAI {
            api_key: "gsk-secret".into(),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn placeholder_key_has_no_credentials() {
        let placeholder = ProviderConfig::OpenAI {
            api_key: "your_groq_api_key_here".into(),
            base_url: None,
        };
        assert!(!placeholder.has_credentials());
        assert!(ProviderConfig::Ollama {
            base_url: default_ollama_url()
        }
        .has_credentials());
    }
}
