//! DuckDuckGo sources
//!
//! [`DuckDuckGoInstant`] reads the Instant Answer JSON API; [`DuckDuckGo`]
//! scrapes snippets from the HTML results page.

use super::traits::*;
use crate::config::SourceSettings;
use crate::error::SourceError;
use crate::network::{accept_html, accept_json, FetchRequest};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::time::Duration;

const INSTANT_URL: &str = "https://api.duckduckgo.com/";
const HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo region code (`kl`) from a tag like `en-US`
fn region_code(lang: &str) -> String {
    let mut parts = lang.split(&['-', '_'][..]);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    match parts.next() {
        Some(region) if !language.is_empty() && !region.is_empty() => {
            format!("{}-{}", region.to_ascii_lowercase(), language)
        }
        _ => "wt-wt".to_string(),
    }
}

/// The fields of the Instant Answer payload this source reads
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstantAnswerPayload {
    #[serde(rename = "AbstractText")]
    abstract_text: String,
    #[serde(rename = "Definition")]
    definition: String,
    /// String for most answers, an object for a few interactive ones
    #[serde(rename = "Answer")]
    answer: serde_json::Value,
}

impl InstantAnswerPayload {
    fn best_text(&self) -> Option<String> {
        [
            self.abstract_text.as_str(),
            self.definition.as_str(),
            self.answer.as_str().unwrap_or_default(),
        ]
        .into_iter()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
    }
}

/// Instant-answer source
pub struct DuckDuckGoInstant {
    api_url: String,
    timeout: Option<Duration>,
}

impl DuckDuckGoInstant {
    pub fn new() -> Self {
        Self::with_settings(&SourceSettings::default())
    }

    pub fn with_settings(settings: &SourceSettings) -> Self {
        Self {
            api_url: settings
                .url
                .clone()
                .unwrap_or_else(|| INSTANT_URL.to_string()),
            timeout: settings.timeout.map(Duration::from_secs_f64),
        }
    }
}

impl Default for DuckDuckGoInstant {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for DuckDuckGoInstant {
    fn name(&self) -> &str {
        "duckduckgo_instant"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::InstantAnswer
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn request(&self, query: &str) -> Result<FetchRequest, SourceError> {
        Ok(FetchRequest::get(&self.api_url)
            .header("Accept", accept_json())
            .param("q", query)
            .param("format", "json")
            .param("no_redirect", "1")
            .param("no_html", "1")
            .param("skip_disambig", "1"))
    }

    fn parse(&self, body: &str) -> Result<Option<String>, SourceError> {
        if body.trim().is_empty() {
            return Ok(None);
        }
        let payload: InstantAnswerPayload =
            serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(payload.best_text())
    }
}

/// General web search source (DuckDuckGo HTML endpoint)
pub struct DuckDuckGo {
    html_url: String,
    max_items: usize,
    lang: String,
    timeout: Option<Duration>,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_settings(&SourceSettings {
            max_items: 5,
            ..Default::default()
        })
    }

    pub fn with_settings(settings: &SourceSettings) -> Self {
        Self {
            html_url: settings
                .url
                .clone()
                .unwrap_or_else(|| HTML_URL.to_string()),
            max_items: settings.max_items.max(1),
            lang: settings.lang.clone(),
            timeout: settings.timeout.map(Duration::from_secs_f64),
        }
    }

    /// Snippet text of each organic result, in page order.
    ///
    /// Falls back to the result title when a result has no snippet, and to
    /// any snippet-classed element when the page has no result containers.
    pub fn parse_snippets(html: &str) -> Result<Vec<String>, SourceError> {
        let document = Html::parse_document(html);

        let result_selector = selector("div.result, div.web-result")?;
        let title_selector = selector("a.result__a")?;
        let snippet_selector = selector(".result__snippet, .result-snippet")?;

        let mut snippets = Vec::new();
        let mut saw_results = false;

        for element in document.select(&result_selector) {
            saw_results = true;
            let class = element.value().attr("class").unwrap_or_default();
            if class.contains("result--ad") {
                continue;
            }

            let snippet = element
                .select(&snippet_selector)
                .next()
                .map(visible_text)
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    element
                        .select(&title_selector)
                        .next()
                        .map(visible_text)
                        .filter(|s| !s.is_empty())
                });

            if let Some(text) = snippet {
                snippets.push(text);
            }
        }

        if !saw_results {
            snippets.extend(
                document
                    .select(&snippet_selector)
                    .map(visible_text)
                    .filter(|s| !s.is_empty()),
            );
        }

        Ok(snippets)
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::GeneralSearch
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn request(&self, query: &str) -> Result<FetchRequest, SourceError> {
        Ok(FetchRequest::post(&self.html_url)
            .header("Accept", accept_html())
            .param("q", query)
            .param("b", "")
            .param("kl", region_code(&self.lang)))
    }

    fn parse(&self, body: &str) -> Result<Option<String>, SourceError> {
        let text = Self::parse_snippets(body)?
            .iter()
            .take(self.max_items)
            .map(|s| terminate_sentence(s))
            .collect::<Vec<_>>()
            .join(" ");

        Ok((!text.is_empty()).then_some(text))
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("bad selector {css}: {e:?}")))
}

fn visible_text(element: ElementRef<'_>) -> String {
    squash_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
