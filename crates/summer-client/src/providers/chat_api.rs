use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use summer_core::config::Provider;
use summer_core::error::AppError;
use summer_core::traits::Summarizer;

use super::{SYSTEM_PROMPT, user_prompt};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const CHAT_TIMEOUT: Duration = Duration::from_secs(30);
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 800;

/// Direct-HTTP adapter for OpenAI-compatible chat-completions APIs.
///
/// Covers both OpenAI and Groq; the two differ only in endpoint and
/// credentials. Single attempt per call — no retry.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    provider: Provider,
    endpoint: &'static str,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl ChatCompletionsClient {
    pub fn new(provider: Provider, api_key: &str, model: &str) -> Result<Self, AppError> {
        let endpoint = match provider {
            Provider::OpenAi => OPENAI_CHAT_URL,
            Provider::Groq => GROQ_CHAT_URL,
            other => {
                return Err(AppError::ConfigError(format!(
                    "{other} is not a chat-completions provider"
                )));
            }
        };

        let client = Client::builder()
            .timeout(CHAT_TIMEOUT)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            provider,
            endpoint,
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs: CHAT_TIMEOUT.as_secs(),
        })
    }
}

// ---- API types ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl Summarizer for ChatCompletionsClient {
    async fn summarize(&self, text: &str, instructions: Option<&str>) -> Result<String, AppError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt(text, instructions),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::info!(
            "Calling {} chat completions with model {}",
            self.provider,
            self.model
        );

        let response = self
            .client
            .post(self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();

            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status_code}: {body}"));

            return Err(AppError::ProviderError {
                provider: self.provider.as_str(),
                message,
                status_code,
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AppError::HttpError(format!("Failed to parse chat completion response: {e}"))
        })?;

        let content = chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::ProviderError {
                provider: self.provider.as_str(),
                message: "Empty completion in response".into(),
                status_code: 200,
            })?;

        Ok(content.clone())
    }
}
