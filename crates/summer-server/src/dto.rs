use serde::{Deserialize, Serialize};

use summer_core::Settings;

// ---------------------------------------------------------------------------
// Summarize
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct SummarizeRequest {
    /// Provider name: "openai", "groq", "watsonx", or "ollama"
    pub provider: Option<String>,
    /// Model identifier for the chosen provider
    pub model: Option<String>,
    /// API key override (falls back to the server environment)
    pub apikey: Option<String>,
    /// Custom summarization instructions
    pub instructions: Option<String>,
    /// Text to summarize; takes precedence over `url`
    pub text: Option<String>,
    /// Page URL to fetch and extract when no text is supplied
    pub url: Option<String>,
    /// Watsonx endpoint override (falls back to WATSONX_URL)
    pub watsonx_url: Option<String>,
    /// Watsonx project scope override (falls back to WATSONX_PROJECT_ID)
    pub project_id: Option<String>,
    /// Watsonx space scope override (falls back to WATSONX_SPACE_ID)
    pub space_id: Option<String>,
}

/// Body of a `/summarize` response. The endpoint always answers HTTP 200;
/// failures are reported in-band so the extension popup can render them
/// without a second error path.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum SummarizeResponse {
    Success { summary: String },
    Failure { error: String },
}

impl SummarizeResponse {
    pub fn success(summary: String) -> Self {
        Self::Success { summary }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self::Failure {
            error: error.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProvidersResponse {
    pub openai: KeyStatus,
    pub groq: KeyStatus,
    pub watsonx: WatsonxStatus,
    pub ollama: KeyStatus,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct KeyStatus {
    pub has_apikey: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WatsonxStatus {
    pub has_apikey: bool,
    pub has_url: bool,
    pub has_project_id: bool,
    pub has_space_id: bool,
    /// True when a key, a URL, and at least one of project/space scope are set.
    pub all_configured: bool,
}

impl ProvidersResponse {
    pub fn from_settings(settings: &Settings) -> Self {
        let has_key = settings.watsonx.api_key.is_some();
        let has_url = settings.watsonx.url.is_some();
        let has_project = settings.watsonx.project_id.is_some();
        let has_space = settings.watsonx.space_id.is_some();

        Self {
            openai: KeyStatus {
                has_apikey: settings.openai_api_key.is_some(),
            },
            groq: KeyStatus {
                has_apikey: settings.groq_api_key.is_some(),
            },
            watsonx: WatsonxStatus {
                has_apikey: has_key,
                has_url,
                has_project_id: has_project,
                has_space_id: has_space,
                all_configured: has_key && has_url && (has_project || has_space),
            },
            // The local daemon needs no credential.
            ollama: KeyStatus { has_apikey: true },
        }
    }
}

#[cfg(test)]
mod tests {
    use summer_core::config::WatsonxSettings;

    use super::*;

    #[test]
    fn test_success_serializes_summary_only() {
        let value =
            serde_json::to_value(SummarizeResponse::success("A summary.".into())).unwrap();
        assert_eq!(value, serde_json::json!({"summary": "A summary."}));
    }

    #[test]
    fn test_failure_serializes_error_only() {
        let value = serde_json::to_value(SummarizeResponse::failure("boom")).unwrap();
        assert_eq!(value, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn test_watsonx_all_configured_accepts_either_scope() {
        let settings = Settings {
            watsonx: WatsonxSettings {
                api_key: Some("k".into()),
                url: Some("https://us-south.ml.cloud.ibm.com".into()),
                project_id: None,
                space_id: Some("s".into()),
            },
            ..Settings::default()
        };
        let response = ProvidersResponse::from_settings(&settings);
        assert!(response.watsonx.all_configured);
        assert!(!response.watsonx.has_project_id);
    }

    #[test]
    fn test_ollama_is_always_available() {
        let response = ProvidersResponse::from_settings(&Settings::default());
        assert!(response.ollama.has_apikey);
        assert!(!response.openai.has_apikey);
        assert!(!response.watsonx.all_configured);
    }
}
