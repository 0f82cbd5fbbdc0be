use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A selectable LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Groq,
    Watsonx,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Watsonx => "watsonx",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, AppError> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            "watsonx" => Ok(Provider::Watsonx),
            "ollama" => Ok(Provider::Ollama),
            other => Err(AppError::ValidationError(format!(
                "Unsupported provider: {other}"
            ))),
        }
    }
}

/// Local inference strategy for the Ollama provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OllamaMode {
    /// Single direct chat call.
    #[default]
    Fast,
    /// Two-stage clean-then-summarize pipeline with fallback to [`OllamaMode::Fast`].
    Agentic,
}

#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub host: String,
    pub mode: OllamaMode,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            mode: OllamaMode::Fast,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WatsonxSettings {
    pub api_key: Option<String>,
    pub url: Option<String>,
    pub project_id: Option<String>,
    pub space_id: Option<String>,
}

/// Environment-sourced provider configuration.
///
/// Constructed once at startup and injected into the server state, so that
/// credential resolution stays testable without touching the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub watsonx: WatsonxSettings,
    pub ollama: OllamaSettings,
}

/// Read an environment variable, treating blank values as unset.
fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    /// Read configuration from environment variables.
    ///
    /// - `OPENAI_API_KEY`, `GROQ_API_KEY` (optional)
    /// - `WATSONX_API_KEY`, `WATSONX_URL`, `WATSONX_PROJECT_ID`, `WATSONX_SPACE_ID` (optional)
    /// - `OLLAMA_HOST` (optional, defaults to `localhost`)
    /// - `OLLAMA_MODE` (optional, `fast` unless set to `agentic`)
    ///
    /// Missing values are not an error here; per-provider requirements are
    /// enforced at request time by the resolution helpers below.
    pub fn from_env() -> Self {
        let mode = match env_nonempty("OLLAMA_MODE").as_deref() {
            Some("agentic") => OllamaMode::Agentic,
            _ => OllamaMode::Fast,
        };

        Self {
            openai_api_key: env_nonempty("OPENAI_API_KEY"),
            groq_api_key: env_nonempty("GROQ_API_KEY"),
            watsonx: WatsonxSettings {
                api_key: env_nonempty("WATSONX_API_KEY"),
                url: env_nonempty("WATSONX_URL"),
                project_id: env_nonempty("WATSONX_PROJECT_ID"),
                space_id: env_nonempty("WATSONX_SPACE_ID"),
            },
            ollama: OllamaSettings {
                host: env_nonempty("OLLAMA_HOST").unwrap_or_else(|| "localhost".to_string()),
                mode,
            },
        }
    }

    /// Resolve the API key for a provider: an explicit request-supplied key
    /// takes precedence, otherwise the environment-sourced value is used.
    pub fn resolve_api_key(
        &self,
        provider: Provider,
        request_key: Option<&str>,
    ) -> Result<String, AppError> {
        if let Some(key) = request_key.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        let env_key = match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Groq => self.groq_api_key.as_deref(),
            Provider::Watsonx => self.watsonx.api_key.as_deref(),
            // The local daemon needs no credential.
            Provider::Ollama => return Ok(String::new()),
        };

        env_key.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(format!(
                "{provider} API key is required. Configure it in the environment or provide one in the request."
            ))
        })
    }

    /// Resolve the full watsonx access configuration with the same
    /// request-over-environment precedence as [`Settings::resolve_api_key`].
    pub fn resolve_watsonx(&self, overrides: &WatsonxOverrides<'_>) -> Result<WatsonxAccess, AppError> {
        let api_key = self.resolve_api_key(Provider::Watsonx, overrides.api_key)?;

        let url = pick(overrides.url, self.watsonx.url.as_deref()).ok_or_else(|| {
            AppError::ConfigError(
                "Watsonx URL is required. Configure it in the environment or provide one in the request."
                    .into(),
            )
        })?;

        let project_id = pick(overrides.project_id, self.watsonx.project_id.as_deref());
        let space_id = pick(overrides.space_id, self.watsonx.space_id.as_deref());

        // Exactly one scope is sent upstream; project_id wins when both are
        // configured. This tie-break is deliberate and load-bearing.
        let scope = match (project_id, space_id) {
            (Some(project), _) => WatsonxScope::Project(project),
            (None, Some(space)) => WatsonxScope::Space(space),
            (None, None) => {
                return Err(AppError::ConfigError(
                    "Watsonx requires either a project_id or a space_id. Configure one in the environment or provide it in the request."
                        .into(),
                ));
            }
        };

        Ok(WatsonxAccess { api_key, url, scope })
    }
}

/// Pick the first non-blank value: request override, then environment.
fn pick(request: Option<&str>, env: Option<&str>) -> Option<String> {
    request
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(env)
        .map(str::to_string)
}

/// Request-supplied watsonx overrides, all optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatsonxOverrides<'a> {
    pub api_key: Option<&'a str>,
    pub url: Option<&'a str>,
    pub project_id: Option<&'a str>,
    pub space_id: Option<&'a str>,
}

/// Fully resolved watsonx configuration, ready for an adapter.
#[derive(Debug, Clone)]
pub struct WatsonxAccess {
    pub api_key: String,
    pub url: String,
    pub scope: WatsonxScope,
}

/// Deployment scope for watsonx generation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatsonxScope {
    Project(String),
    Space(String),
}
