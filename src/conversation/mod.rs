//! Conversation step
//!
//! The boundary between the search core and the language model.

mod llm;
mod message;
mod prompt;
mod step;

pub use llm::{GenerationOptions, LanguageModel, OllamaClient};
pub use message::{Message, Role};
pub use prompt::build_prompt;
pub use step::{ConversationStep, APOLOGY, GREETING};
