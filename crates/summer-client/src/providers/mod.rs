//! Provider adapters: each one builds a provider-specific request, performs
//! a single call, and unwraps the response into raw completion text.

pub mod chat_api;
pub mod ollama;
pub mod watsonx;

pub use chat_api::ChatCompletionsClient;
pub use ollama::OllamaClient;
pub use watsonx::WatsonxClient;

/// System directive shared by the chat-style adapters. Kept explicit about
/// output format so the output cleaner has less work to do.
pub(crate) const SYSTEM_PROMPT: &str = "You are a professional content summarizer. Provide ONLY the final summary without any thinking process, reasoning, meta-commentary, or explanations.

Do NOT include:
- <think> tags or thinking processes
- \"Here's a summary\" or similar introductions
- Your reasoning or analysis process
- Meta-commentary about the task

Provide ONLY the direct, clean summary content.";

/// Build the user message: caller instructions plus text, or the default
/// summarization directive.
pub(crate) fn user_prompt(text: &str, instructions: Option<&str>) -> String {
    match instructions.map(str::trim).filter(|i| !i.is_empty()) {
        Some(instructions) => format!("{instructions}\n\nText to summarize:\n{text}"),
        None => format!(
            "Provide a brief, concise summary of the following text (2-3 paragraphs max):\n\n{text}"
        ),
    }
}
