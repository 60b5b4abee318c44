//! Prompt assembly

use super::message::Message;

const HEADER: &str = "Based on the search results below, provide a concise, \
well-structured answer to the user's question.";

const INSTRUCTIONS: &str = "Instructions:
- Keep response under 300 words
- Focus on the most recent and relevant information
- Use clear, structured formatting
- If search results are limited, acknowledge this
";

/// Build the model prompt from the condensed search summary.
///
/// Only the last `history_limit` messages of `history` are included.
pub fn build_prompt(
    summary: &str,
    history: &[Message],
    history_limit: usize,
    question: &str,
) -> String {
    let mut prompt = String::with_capacity(summary.len() + question.len() + 512);
    prompt.push_str(HEADER);
    prompt.push_str("\n\nSEARCH RESULTS:\n");
    prompt.push_str(summary);
    prompt.push_str("\n\n");

    let recent = &history[history.len().saturating_sub(history_limit)..];
    if !recent.is_empty() {
        prompt.push_str("CONVERSATION SO FAR:\n");
        for message in recent {
            prompt.push_str(message.role.label());
            prompt.push_str(": ");
            prompt.push_str(message.content.trim());
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str("USER QUESTION: ");
    prompt.push_str(question);
    prompt.push_str("\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt
}
