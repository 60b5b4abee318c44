//! Settings structures for research-chat configuration

use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub extractor: ExtractorSettings,
    pub llm: LlmSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (RESEARCH_CHAT_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("RESEARCH_CHAT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("RESEARCH_CHAT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("RESEARCH_CHAT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("RESEARCH_CHAT_LLM_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Ok(val) = std::env::var("RESEARCH_CHAT_LLM_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("RESEARCH_CHAT_SEARCH_MODE") {
            match val.to_ascii_lowercase().as_str() {
                "sequential" => self.search.mode = SearchMode::Sequential,
                "racing" => self.search.mode = SearchMode::Racing,
                _ => {}
            }
        }
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_timeout("outgoing.request_timeout", self.outgoing.request_timeout)?;
        check_timeout("llm.timeout", self.llm.timeout)?;
        if self.extractor.max_chars == 0 {
            return Err(ConfigError::Invalid(
                "extractor.max_chars must be greater than 0".into(),
            ));
        }
        if self.extractor.max_sentences == 0 {
            return Err(ConfigError::Invalid(
                "extractor.max_sentences must be greater than 0".into(),
            ));
        }
        if self.extractor.empty_fallback.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "extractor.empty_fallback must not be empty".into(),
            ));
        }
        if self.search.fallback_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "search.fallback_message must not be empty".into(),
            ));
        }
        for (name, source) in self.search.sources.iter() {
            if source.max_items == 0 {
                return Err(ConfigError::Invalid(format!(
                    "search.sources.{name}.max_items must be greater than 0"
                )));
            }
            if let Some(ref url) = source.url {
                url::Url::parse(url).map_err(|e| {
                    ConfigError::Invalid(format!("search.sources.{name}.url is invalid: {e}"))
                })?;
            }
            if let Some(timeout) = source.timeout {
                check_timeout(&format!("search.sources.{name}.timeout"), timeout)?;
            }
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(
                "llm.temperature must be within 0.0..=2.0".into(),
            ));
        }
        url::Url::parse(&self.llm.base_url)
            .map_err(|e| ConfigError::Invalid(format!("llm.base_url is invalid: {e}")))?;
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        Ok(())
    }
}

/// Timeouts become `Duration`s, so they must be finite and positive
fn check_timeout(key: &str, secs: f64) -> std::result::Result<(), ConfigError> {
    if secs.is_finite() && secs > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{key} must be a finite number of seconds greater than 0"
        )))
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the HTTP surface
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Research Chat".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// User agent string (none = random)
    pub useragent: Option<String>,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            useragent: None,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// How the orchestrator drives its strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// One strategy at a time, in priority order
    #[default]
    Sequential,
    /// All strategies at once; results still taken in priority order
    Racing,
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub mode: SearchMode,
    /// Returned when every source comes back empty
    pub fallback_message: String,
    pub sources: SourcesSettings,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            mode: SearchMode::Sequential,
            fallback_message: "No search results found".to_string(),
            sources: SourcesSettings::default(),
        }
    }
}

/// Per-source settings. Field order is the fixed priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesSettings {
    pub news: SourceSettings,
    pub instant: SourceSettings,
    pub web: SourceSettings,
}

impl SourcesSettings {
    /// (name, settings) pairs in priority order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SourceSettings)> {
        [
            ("news", &self.news),
            ("instant", &self.instant),
            ("web", &self.web),
        ]
        .into_iter()
    }
}

impl Default for SourcesSettings {
    fn default() -> Self {
        Self {
            news: SourceSettings {
                max_items: 3,
                ..Default::default()
            },
            instant: SourceSettings {
                max_items: 1,
                ..Default::default()
            },
            web: SourceSettings {
                max_items: 5,
                ..Default::default()
            },
        }
    }
}

/// Settings for one source strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub disabled: bool,
    /// Endpoint override (none = the public backend)
    pub url: Option<String>,
    /// How many feed items / snippets to concatenate
    pub max_items: usize,
    /// Timeout override in seconds
    pub timeout: Option<f64>,
    /// Language/region hint passed to backends that accept one
    pub lang: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            disabled: false,
            url: None,
            max_items: 3,
            timeout: None,
            lang: "en-US".to_string(),
        }
    }
}

/// Extractor tuning. The defaults are empirical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Character budget before the ellipsis marker is appended
    pub max_chars: usize,
    /// Sentences shorter than this (in characters) are noise
    pub min_sentence_chars: usize,
    pub max_sentences: usize,
    pub ellipsis: String,
    /// Returned when no sentence survives filtering
    pub empty_fallback: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_chars: 800,
            min_sentence_chars: 15,
            max_sentences: 4,
            ellipsis: "...".to_string(),
            empty_fallback: "No relevant information was found in the search results."
                .to_string(),
        }
    }
}

/// Language model collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Ollama base URL
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub context_window_tokens: u32,
    /// Request timeout in seconds
    pub timeout: f64,
    /// How many prior messages go into the prompt
    pub history_messages: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.1".to_string(),
            temperature: 0.1,
            max_output_tokens: 512,
            context_window_tokens: 4096,
            timeout: 120.0,
            history_messages: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8888);
        assert!(!settings.general.debug);
        assert_eq!(settings.outgoing.request_timeout, 10.0);
        assert_eq!(settings.search.mode, SearchMode::Sequential);
        assert_eq!(settings.search.fallback_message, "No search results found");
        assert_eq!(settings.extractor.max_chars, 800);
        assert_eq!(settings.extractor.min_sentence_chars, 15);
        assert_eq!(settings.extractor.max_sentences, 4);
        assert_eq!(settings.llm.model, "llama3.1");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_sources_priority_order() {
        let settings = Settings::default();
        let names: Vec<_> = settings.search.sources.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["news", "instant", "web"]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
search:
  mode: racing
  sources:
    instant:
      disabled: true
extractor:
  max_chars: 400
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.mode, SearchMode::Racing);
        assert!(settings.search.sources.instant.disabled);
        assert!(!settings.search.sources.news.disabled);
        assert_eq!(settings.search.sources.web.max_items, 5);
        assert_eq!(settings.extractor.max_chars, 400);
        assert_eq!(settings.extractor.min_sentence_chars, 15);
        assert_eq!(settings.server.port, 8888);
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let mut settings = Settings::default();
        settings.extractor.max_chars = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("max_chars"));
    }

    #[test]
    fn test_validate_rejects_bad_source_timeout() {
        let mut settings = Settings::default();
        settings.search.sources.web.timeout = Some(0.0);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("search.sources.web.timeout"));
    }

    #[test]
    fn test_validate_rejects_blank_fallback() {
        let mut settings = Settings::default();
        settings.search.fallback_message = "   ".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut settings = Settings::default();
        settings.llm.base_url = "localhost without scheme".into();
        assert!(settings.validate().unwrap_err().to_string().contains("llm.base_url"));

        let mut settings = Settings::default();
        settings.search.sources.news.url = Some("::".into());
        assert!(settings
            .validate()
            .unwrap_err()
            .to_string()
            .contains("search.sources.news.url"));
    }

    #[test]
    fn test_validate_rejects_non_finite_timeouts() {
        for bad in [
            "outgoing:\n  request_timeout: .nan\n",
            "outgoing:\n  request_timeout: .inf\n",
            "outgoing:\n  request_timeout: -3\n",
        ] {
            let settings: Settings = serde_yaml::from_str(bad).unwrap();
            let err = settings.validate().unwrap_err();
            assert!(err.to_string().contains("outgoing.request_timeout"), "{bad}");
        }

        let yaml = "search:\n  sources:\n    news:\n      timeout: .nan\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings
            .validate()
            .unwrap_err()
            .to_string()
            .contains("search.sources.news.timeout"));
    }

    #[test]
    fn test_validate_rejects_bad_llm_timeout() {
        for bad in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let mut settings = Settings::default();
            settings.llm.timeout = bad;
            let err = settings.validate().unwrap_err();
            assert!(err.to_string().contains("llm.timeout"));
        }
    }
}
