//! Application state shared across handlers

use crate::config::Settings;
use crate::conversation::{ConversationStep, Message};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search, condense and generate pipeline
    pub step: Arc<ConversationStep>,
    /// The single conversation this instance serves.
    ///
    /// Held for a whole turn, so turns never overlap.
    pub history: Arc<Mutex<Vec<Message>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, step: ConversationStep) -> Self {
        Self {
            settings: Arc::new(settings),
            step: Arc::new(step),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
