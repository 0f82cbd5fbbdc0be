use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use summer_core::config::{WatsonxAccess, WatsonxScope};
use summer_core::error::AppError;
use summer_core::traits::Summarizer;

const GENERATION_PATH: &str = "/ml/v1/text/generation?version=2023-05-29";
const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_NEW_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.1;

/// Adapter for the IBM watsonx.ai text-generation endpoint.
///
/// Sends greedy-decoded generation requests scoped to either a project or a
/// space (exactly one, resolved upstream with project taking precedence).
#[derive(Clone)]
pub struct WatsonxClient {
    client: Client,
    access: WatsonxAccess,
    model: String,
    timeout_secs: u64,
}

impl WatsonxClient {
    pub fn new(access: WatsonxAccess, model: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            access,
            model: model.to_string(),
            timeout_secs: GENERATION_TIMEOUT.as_secs(),
        })
    }

    fn generation_url(&self) -> String {
        format!(
            "{}{GENERATION_PATH}",
            self.access.url.trim_end_matches('/')
        )
    }
}

// ---- API types ----

#[derive(Serialize)]
struct GenerationRequest {
    input: String,
    model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    space_id: Option<String>,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    decoding_method: &'static str,
    max_new_tokens: u32,
    temperature: f32,
}

fn build_prompt(text: &str, instructions: Option<&str>) -> String {
    match instructions.map(str::trim).filter(|i| !i.is_empty()) {
        Some(instructions) => {
            format!("{instructions}\n\nPlease summarize the following content:\n\n{text}")
        }
        None => format!(
            "Please create a clear, concise summary of the following content. Focus on the main points and key information:\n\n{text}"
        ),
    }
}

/// Normalize the generation response to plain text.
///
/// The service has returned at least three shapes in the wild: a bare
/// string, `{"generated_text": ...}`, and `{"results": [{"generated_text":
/// ...}]}`. Anything else is stringified as a last resort.
pub(crate) fn extract_generated_text(value: &serde_json::Value) -> String {
    if let Some(text) = value.as_str() {
        return text.to_string();
    }

    if let Some(text) = value.get("generated_text").and_then(|v| v.as_str()) {
        return text.to_string();
    }

    if let Some(first) = value
        .get("results")
        .and_then(|v| v.as_array())
        .and_then(|results| results.first())
    {
        return match first.get("generated_text").and_then(|v| v.as_str()) {
            Some(text) => text.to_string(),
            None => first.to_string(),
        };
    }

    value.to_string()
}

impl Summarizer for WatsonxClient {
    async fn summarize(&self, text: &str, instructions: Option<&str>) -> Result<String, AppError> {
        let (project_id, space_id) = match &self.access.scope {
            WatsonxScope::Project(id) => (Some(id.clone()), None),
            WatsonxScope::Space(id) => (None, Some(id.clone())),
        };

        let request = GenerationRequest {
            input: build_prompt(text, instructions),
            model_id: self.model.clone(),
            project_id,
            space_id,
            parameters: GenerationParameters {
                decoding_method: "greedy",
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
            },
        };

        tracing::info!("Calling watsonx generation with model {}", self.model);

        let response = self
            .client
            .post(self.generation_url())
            .header("Authorization", format!("Bearer {}", self.access.api_key))
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
            return Err(AppError::ProviderError {
                provider: "watsonx",
                message: format!("HTTP {status_code}: {body}"),
                status_code,
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::HttpError(format!("Failed to parse watsonx response: {e}"))
        })?;

        let text = extract_generated_text(&body);
        if text.trim().is_empty() {
            return Err(AppError::ProviderError {
                provider: "watsonx",
                message: "Empty generation in response".into(),
                status_code: 200,
            });
        }

        Ok(text)
    }
}
