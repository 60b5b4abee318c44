//! One conversation turn: search, condense, prompt, generate

use super::llm::{GenerationOptions, LanguageModel};
use super::message::Message;
use super::prompt::build_prompt;
use crate::config::LlmSettings;
use crate::extract::Extractor;
use crate::search::Orchestrator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Reply to an empty conversation
pub const GREETING: &str = "Hi! Ask me anything and I'll search for the latest information.";

/// Reply when the language model fails
pub const APOLOGY: &str =
    "I encountered an error generating the response. Please try rephrasing your question.";

/// Wires the orchestrator, extractor and language model together.
///
/// Holds no per-conversation state; callers own the history.
pub struct ConversationStep {
    orchestrator: Orchestrator,
    extractor: Extractor,
    llm: Arc<dyn LanguageModel>,
    options: GenerationOptions,
    history_limit: usize,
}

impl ConversationStep {
    pub fn new(
        orchestrator: Orchestrator,
        extractor: Extractor,
        llm: Arc<dyn LanguageModel>,
        settings: &LlmSettings,
    ) -> Self {
        Self {
            orchestrator,
            extractor,
            llm,
            options: GenerationOptions::from(settings),
            history_limit: settings.history_messages,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Produce the assistant reply to `query`.
    ///
    /// `history` holds the messages before this one. Never fails: LLM
    /// errors become [`APOLOGY`].
    pub async fn handle_user_message(&self, query: &str, history: &[Message]) -> String {
        let query = query.trim();
        if query.is_empty() && history.is_empty() {
            return GREETING.to_string();
        }

        let start = Instant::now();
        info!("User question: {:.100}", query);

        let raw = self.orchestrator.search(query).await;
        let summary = self.extractor.condense(&raw);
        info!(
            "Search completed, processed {} -> {} chars",
            raw.chars().count(),
            summary.chars().count()
        );

        let prompt = build_prompt(&summary, history, self.history_limit, query);
        debug!("Prompt is {} chars", prompt.len());

        match self.llm.generate(&prompt, &self.options).await {
            Ok(text) => {
                info!("Response generated by {} in {:?}", self.llm.name(), start.elapsed());
                text
            }
            Err(e) => {
                error!("LLM failed: {}", e);
                APOLOGY.to_string()
            }
        }
    }

    /// Run one turn against `history` and append its messages.
    ///
    /// An empty opening message only appends the greeting.
    pub async fn respond(&self, history: &mut Vec<Message>, query: &str) -> String {
        let reply = self.handle_user_message(query, history).await;
        if !query.trim().is_empty() || !history.is_empty() {
            history.push(Message::user(query.trim()));
        }
        history.push(Message::assistant(reply.clone()));
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorSettings;
    use crate::error::LlmError;
    use crate::sources::{RawResult, Strategy};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedStrategy {
        text: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Strategy for FixedStrategy {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn attempt(&self, _query: &str) -> RawResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RawResult::from_text(self.text)
        }
    }

    #[derive(Default)]
    struct StubModel {
        fail: bool,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for StubModel {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(
            &self,
            prompt: &str,
            options: &GenerationOptions,
        ) -> Result<String, LlmError> {
            assert_eq!(options.temperature, 0.1);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(LlmError::Status(500))
            } else {
                Ok("Here is what I found.".to_string())
            }
        }
    }

    fn step_with(
        text: &'static str,
        model: Arc<StubModel>,
    ) -> (ConversationStep, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Arc::new(FixedStrategy {
            text,
            calls: calls.clone(),
        });
        let step = ConversationStep::new(
            Orchestrator::new(vec![strategy]),
            Extractor::new(ExtractorSettings::default()),
            model,
            &LlmSettings::default(),
        );
        (step, calls)
    }

    #[tokio::test]
    async fn test_greeting_without_search() {
        let model = Arc::new(StubModel::default());
        let (step, calls) = step_with("unused", model.clone());

        assert_eq!(step.handle_user_message("   ", &[]).await, GREETING);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_reaches_prompt() {
        let model = Arc::new(StubModel::default());
        let (step, calls) = step_with(
            "Rust 1.80 was released today with many improvements. https://blog.rust-lang.org",
            model.clone(),
        );

        let reply = step.handle_user_message("  what's new in rust?  ", &[]).await;
        assert_eq!(reply, "Here is what I found.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0]
            .contains("SEARCH RESULTS:\nRust 1.80 was released today with many improvements.\n"));
        assert!(prompts[0].contains("USER QUESTION: what's new in rust?\n"));
        assert!(!prompts[0].contains("blog.rust-lang.org"));
    }

    #[tokio::test]
    async fn test_sentinel_flows_through_when_nothing_found() {
        let model = Arc::new(StubModel::default());
        let (step, _) = step_with("", model.clone());

        step.handle_user_message("obscure query", &[]).await;
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("SEARCH RESULTS:\nNo search results found\n"));
    }

    #[tokio::test]
    async fn test_llm_failure_returns_apology() {
        let model = Arc::new(StubModel {
            fail: true,
            ..Default::default()
        });
        let (step, _) = step_with("Some sufficiently long search result text.", model);

        assert_eq!(step.handle_user_message("question", &[]).await, APOLOGY);
    }

    #[tokio::test]
    async fn test_respond_appends_turn() {
        let model = Arc::new(StubModel::default());
        let (step, _) = step_with("Some sufficiently long search result text.", model.clone());
        let mut history = Vec::new();

        step.respond(&mut history, "").await;
        assert_eq!(history, vec![Message::assistant(GREETING)]);

        step.respond(&mut history, " first question ").await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[1], Message::user("first question"));
        assert_eq!(history[2], Message::assistant("Here is what I found."));

        step.respond(&mut history, "follow up").await;
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[1].contains("User: first question\nAssistant: Here is what I found.\n"));
    }
}
