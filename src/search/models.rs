//! Search outcome models

use crate::sources::RawResult;
use serde::Serialize;
use std::time::Duration;

/// Record of one strategy attempt within a search
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Attempt {
    /// Source name
    pub source: String,
    /// `success`, `empty` or `failure`
    pub result: &'static str,
    /// Failure reason, if any
    pub error: Option<String>,
    pub time_ms: u64,
}

impl Attempt {
    pub fn new(source: impl Into<String>, result: &RawResult, elapsed: Duration) -> Self {
        let error = match result {
            RawResult::Failure(e) => Some(e.to_string()),
            _ => None,
        };
        Self {
            source: source.into(),
            result: result.kind(),
            error,
            time_ms: elapsed.as_millis() as u64,
        }
    }
}

/// What the orchestrator produced for one query.
///
/// `text` is never empty: it is either the winning source's text or the
/// fallback sentinel, in which case `source` is `None`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub text: String,
    pub source: Option<String>,
    pub attempts: Vec<Attempt>,
}

impl SearchOutcome {
    pub fn is_fallback(&self) -> bool {
        self.source.is_none()
    }
}
