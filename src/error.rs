//! Error types
//!
//! None of these cross the core's outer boundary: fetch and source errors
//! are absorbed by the strategies, LLM errors by the conversation step.
//! They exist so each layer can log a precise cause.

/// Failure of a single outbound HTTP call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The call did not complete within its time budget
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Transport, DNS, TLS or non-2xx status
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Why a source strategy produced no usable text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("timeout")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    /// Backend returned a payload that could not be decoded
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<FetchError> for SourceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout(_) => SourceError::Timeout,
            FetchError::Http(msg) => SourceError::Http(msg),
        }
    }
}

/// Failure of the language-model collaborator
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM returned HTTP {0}")]
    Status(u16),

    #[error("LLM response could not be decoded: {0}")]
    Decode(String),
}

/// Invalid settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fetch_timeout_maps_to_source_timeout() {
        let err: SourceError = FetchError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(err, SourceError::Timeout);
    }

    #[test]
    fn fetch_http_keeps_message() {
        let err: SourceError = FetchError::Http("HTTP status 503".into()).into();
        assert_eq!(err.to_string(), "HTTP error: HTTP status 503");
    }

    #[test]
    fn display_config() {
        let err = ConfigError::Invalid("extractor.max_chars must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: extractor.max_chars must be greater than 0"
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FetchError>();
        assert_send_sync::<SourceError>();
        assert_send_sync::<LlmError>();
    }
}
