use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use summer_core::error::AppError;
use summer_core::traits::{Refiner, Summarizer};

use super::{SYSTEM_PROMPT, user_prompt};

const OLLAMA_PORT: u16 = 11434;

// Local inference is slow; allow well beyond the hosted-API budget.
const CHAT_TIMEOUT: Duration = Duration::from_secs(90);
const TEMPERATURE: f32 = 0.1;

const REFINE_SYSTEM_PROMPT: &str = "You are a text cleaning assistant. Remove boilerplate such as navigation links, cookie notices, advertisements, and repeated lines from the text you are given. Do not summarize, rephrase, or add commentary. Return ONLY the cleaned text.";

/// Adapter for a local Ollama daemon.
///
/// Implements the fast path (`Summarizer`: one non-streaming chat call) and
/// the first stage of the agentic path (`Refiner`: a cleanup-only pass). The
/// two-stage composition and its fallback live in the orchestrator.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(host: &str, model: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(CHAT_TIMEOUT)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("http://{host}:{OLLAMA_PORT}"),
            model: model.to_string(),
            timeout_secs: CHAT_TIMEOUT.as_secs(),
        })
    }

    async fn chat(&self, system: &str, user: String) -> Result<String, AppError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: system.to_string(),
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    AppError::NetworkError(format!(
                        "Connection to local Ollama daemon failed: {e}"
                    ))
                } else {
                    AppError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError {
                provider: "ollama",
                message: format!("HTTP {status_code}: {body}"),
                status_code,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to parse Ollama response: {e}")))?;

        let content = chat_response.message.content;
        if content.trim().is_empty() {
            return Err(AppError::ProviderError {
                provider: "ollama",
                message: "Empty completion in response".into(),
                status_code: 200,
            });
        }

        Ok(content)
    }
}

// ---- API types ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl Summarizer for OllamaClient {
    async fn summarize(&self, text: &str, instructions: Option<&str>) -> Result<String, AppError> {
        tracing::info!("Calling local Ollama chat with model {}", self.model);
        self.chat(SYSTEM_PROMPT, user_prompt(text, instructions))
            .await
    }
}

impl Refiner for OllamaClient {
    async fn refine(&self, text: &str) -> Result<String, AppError> {
        tracing::info!("Running Ollama cleaning pass with model {}", self.model);
        self.chat(
            REFINE_SYSTEM_PROMPT,
            format!("Clean the following text:\n\n{text}"),
        )
        .await
    }
}
