//! Condensing raw search text into a bounded prompt fragment

use super::sentences::{char_len, normalize_whitespace, split_sentences, strip_urls, truncate_chars};
use crate::config::ExtractorSettings;

/// Pure, deterministic, total text condenser
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    settings: ExtractorSettings,
}

impl Extractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Upper bound on the length (in characters) of any output
    pub fn max_output_chars(&self) -> usize {
        self.settings.max_chars + char_len(&self.settings.ellipsis)
    }

    /// Condense `raw` into at most `max_sentences` informative sentences.
    ///
    /// Steps, in order: collapse whitespace; split at terminal punctuation;
    /// drop URL tokens and units shorter than `min_sentence_chars`; keep the
    /// first `max_sentences`; join with spaces and cut to `max_chars`
    /// characters plus the ellipsis. Never returns an empty string.
    pub fn condense(&self, raw: &str) -> String {
        let normalized = normalize_whitespace(raw);

        let kept: Vec<String> = split_sentences(&normalized)
            .into_iter()
            .map(strip_urls)
            .filter(|unit| !unit.is_empty() && char_len(unit) >= self.settings.min_sentence_chars)
            .take(self.settings.max_sentences)
            .collect();

        if kept.is_empty() {
            return self.bound(&self.settings.empty_fallback);
        }

        self.bound(&kept.join(" "))
    }

    fn bound(&self, text: &str) -> String {
        if char_len(text) <= self.settings.max_chars {
            return text.to_string();
        }
        let mut out = truncate_chars(text, self.settings.max_chars).to_string();
        out.push_str(&self.settings.ellipsis);
        out
    }
}

/// Condense with default thresholds and a custom character budget
pub fn condense(raw_text: &str, max_chars: usize) -> String {
    Extractor::new(ExtractorSettings {
        max_chars,
        ..Default::default()
    })
    .condense(raw_text)
}
