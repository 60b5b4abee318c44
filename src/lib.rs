//! Research Chat: answers questions with a local language model grounded
//! in live web search results.
//!
//! A query runs through three search backends in priority order (news feed,
//! instant answer, general web search); the first usable text is condensed
//! into a short, bounded summary and handed to the model as context.

pub mod config;
pub mod conversation;
pub mod error;
pub mod extract;
pub mod network;
pub mod search;
pub mod sources;
pub mod web;

pub use config::Settings;
pub use conversation::{ConversationStep, LanguageModel, Message};
pub use extract::{condense, Extractor};
pub use search::{Orchestrator, SearchOutcome};
pub use sources::{RawResult, Strategy};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
