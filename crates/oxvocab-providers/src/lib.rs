//! oxvocab-providers — LLM chat providers and the translator built on them.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible backends (Groq by
//! default) and Ollama, and the `Translator` trait on top of any provider.

pub mod config;
pub mod error;
pub mod fallback;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod translator;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, QuizConfig};
pub use error::{ProviderError, TranslateError};
pub use translator::LlmTranslator;
