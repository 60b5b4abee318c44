//! Source traits and types

use crate::error::SourceError;
use crate::network::{FetchRequest, HttpClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of one strategy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResult {
    /// Backend-native text, possibly noisy, never blank
    Success(String),
    /// Well-formed response without usable content
    Empty,
    /// Timeout, HTTP or parse failure
    Failure(SourceError),
}

impl RawResult {
    /// Wrap parsed text, mapping blank text to `Empty`
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            RawResult::Empty
        } else {
            RawResult::Success(text)
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            RawResult::Success(_) => "success",
            RawResult::Empty => "empty",
            RawResult::Failure(_) => "failure",
        }
    }
}

/// The three built-in sources, in fixed priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Freshness first
    NewsFeed,
    /// Authoritative structured answer second
    InstantAnswer,
    /// Broad web last
    GeneralSearch,
}

impl SourceKind {
    /// Priority order. Never reordered by configuration.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::NewsFeed,
        SourceKind::InstantAnswer,
        SourceKind::GeneralSearch,
    ];

    /// Key of this source under `search.sources` in settings
    pub fn settings_key(&self) -> &'static str {
        match self {
            SourceKind::NewsFeed => "news",
            SourceKind::InstantAnswer => "instant",
            SourceKind::GeneralSearch => "web",
        }
    }
}

/// A search backend: builds its request and parses its response shape.
///
/// Both halves are synchronous and free of I/O so they can be tested on
/// canned payloads. [`FetchingStrategy`] supplies the network call.
pub trait Source: Send + Sync {
    /// Source name, used in logs
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Timeout override for this source
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Build the HTTP request for a query
    fn request(&self, query: &str) -> Result<FetchRequest, SourceError>;

    /// Parse a response body into plain text.
    ///
    /// `Ok(None)` means the payload was well formed but had nothing usable.
    fn parse(&self, body: &str) -> Result<Option<String>, SourceError>;
}

/// Uniform attempt contract the orchestrator drives.
///
/// Implementations must absorb every failure into the returned
/// [`RawResult`]; nothing propagates to the caller.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    async fn attempt(&self, query: &str) -> RawResult;
}

/// A [`Source`] paired with the Fetcher
pub struct FetchingStrategy<S> {
    source: S,
    client: HttpClient,
}

impl<S: Source> FetchingStrategy<S> {
    pub fn new(source: S, client: HttpClient) -> Self {
        Self { source, client }
    }

    fn timeout(&self) -> Duration {
        self.source
            .timeout()
            .unwrap_or_else(|| self.client.default_timeout())
    }
}

#[async_trait]
impl<S: Source> Strategy for FetchingStrategy<S> {
    fn name(&self) -> &str {
        self.source.name()
    }

    async fn attempt(&self, query: &str) -> RawResult {
        let name = self.source.name();
        let start = Instant::now();

        let request = match self.source.request(query) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to build request for {}: {}", name, e);
                return RawResult::Failure(e);
            }
        };

        let body = match self.client.fetch_with_timeout(request, self.timeout()).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Request failed for {}: {}", name, e);
                return RawResult::Failure(e.into());
            }
        };

        let result = match self.source.parse(&body) {
            Ok(Some(text)) => RawResult::from_text(text),
            Ok(None) => RawResult::Empty,
            Err(e) => {
                warn!("Failed to parse response from {}: {}", name, e);
                RawResult::Failure(e)
            }
        };

        debug!(
            "Source {} ({:?}) returned {} ({} bytes) in {:?}",
            name,
            self.source.kind(),
            result.kind(),
            body.len(),
            start.elapsed()
        );
        result
    }
}

/// Append a period if `text` has no terminal punctuation
pub(crate) fn terminate_sentence(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.ends_with(&['.', '!', '?'][..]) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// Collapse whitespace, including non-breaking spaces, to single spaces
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct EchoSource {
        url: String,
    }

    impl Source for EchoSource {
        fn name(&self) -> &str {
            "echo"
        }

        fn kind(&self) -> SourceKind {
            SourceKind::GeneralSearch
        }

        fn timeout(&self) -> Option<Duration> {
            Some(Duration::from_millis(300))
        }

        fn request(&self, query: &str) -> Result<FetchRequest, SourceError> {
            Ok(FetchRequest::get(&self.url).param("q", query))
        }

        fn parse(&self, body: &str) -> Result<Option<String>, SourceError> {
            match body {
                "broken" => Err(SourceError::Parse("unexpected payload".into())),
                "" => Ok(None),
                text => Ok(Some(text.to_string())),
            }
        }
    }

    async fn attempt_with(response: ResponseTemplate) -> RawResult {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(response)
            .mount(&server)
            .await;
        let strategy = FetchingStrategy::new(
            EchoSource { url: server.uri() },
            HttpClient::new().unwrap(),
        );
        strategy.attempt("rust").await
    }

    #[test]
    fn test_from_text_maps_blank_to_empty() {
        assert_eq!(RawResult::from_text("  \n "), RawResult::Empty);
        assert_eq!(
            RawResult::from_text("text"),
            RawResult::Success("text".into())
        );
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            SourceKind::ALL.map(|k| k.settings_key()),
            ["news", "instant", "web"]
        );
    }

    #[test]
    fn test_terminate_sentence() {
        assert_eq!(terminate_sentence("Done"), "Done.");
        assert_eq!(terminate_sentence("Done? "), "Done?");
        assert_eq!(terminate_sentence(""), "");
    }

    #[test]
    fn test_squash_whitespace_handles_nbsp() {
        assert_eq!(squash_whitespace("a\u{a0}\u{a0}b \n c"), "a b c");
    }

    #[tokio::test]
    async fn test_attempt_success() {
        let result = attempt_with(ResponseTemplate::new(200).set_body_string("found it")).await;
        assert_eq!(result, RawResult::Success("found it".into()));
    }

    #[tokio::test]
    async fn test_attempt_empty_payload() {
        let result = attempt_with(ResponseTemplate::new(200)).await;
        assert_eq!(result, RawResult::Empty);
    }

    #[tokio::test]
    async fn test_attempt_parse_failure_is_absorbed() {
        let result = attempt_with(ResponseTemplate::new(200).set_body_string("broken")).await;
        assert!(matches!(result, RawResult::Failure(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn test_attempt_http_failure_is_absorbed() {
        let result = attempt_with(ResponseTemplate::new(500)).await;
        assert!(matches!(result, RawResult::Failure(SourceError::Http(_))));
    }

    #[tokio::test]
    async fn test_attempt_timeout_is_absorbed() {
        let result = attempt_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(10)),
        )
        .await;
        assert_eq!(result, RawResult::Failure(SourceError::Timeout));
    }
}
