//! Provider and translator error types.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Whether retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        match self {
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_) => true,
            ProviderError::ApiError { status, .. } => {
                (400..500).contains(status) && *status != 408
            }
            ProviderError::RateLimited { .. }
            | ProviderError::Timeout(_)
            | ProviderError::NetworkError(_) => false,
        }
    }

    /// Delay requested by the backend before the next attempt.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Errors returned by the translator.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Every attempt failed and no fallback meaning exists.
    #[error("failed to translate '{word}' after {attempts} attempt(s): {last_error}")]
    Exhausted {
        word: String,
        attempts: u32,
        last_error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("x".into()).is_permanent());
        assert!(ProviderError::ApiError {
            status: 400,
            message: String::new()
        }
        .is_permanent());
    }

    #[test]
    fn transient_errors() {
        assert!(!ProviderError::RateLimited { retry_after_ms: 1 }.is_permanent());
        assert!(!ProviderError::Timeout(10).is_permanent());
        assert!(!ProviderError::NetworkError("reset".into()).is_permanent());
        for status in [408, 500, 503] {
            assert!(!ProviderError::ApiError {
                status,
                message: String::new()
            }
            .is_permanent());
        }
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        assert_eq!(
            ProviderError::RateLimited {
                retry_after_ms: 3000
            }
            .retry_after_ms(),
            Some(3000)
        );
        assert_eq!(ProviderError::Timeout(1).retry_after_ms(), None);
    }
}
