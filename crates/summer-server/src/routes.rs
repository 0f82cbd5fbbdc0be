use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use summer_client::{ArticleExtractor, ChatCompletionsClient, OllamaClient, WatsonxClient};
use summer_core::config::WatsonxOverrides;
use summer_core::service::MIN_TEXT_CHARS;
use summer_core::{AppError, OllamaMode, Provider, Settings, SummarizeInput, SummarizeService};

use crate::dto::{ProvidersResponse, SummarizeRequest, SummarizeResponse};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/providers", get(get_providers))
        .route("/summarize", post(summarize))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/providers",
    responses(
        (status = 200, description = "Configuration status per provider", body = ProvidersResponse),
    ),
    tag = "providers"
)]
pub async fn get_providers(State(state): State<Arc<AppState>>) -> axum::Json<ProvidersResponse> {
    axum::Json(ProvidersResponse::from_settings(&state.settings))
}

// ---------------------------------------------------------------------------
// Summarize
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary or in-band error", body = SummarizeResponse),
    ),
    tag = "summarize"
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<SummarizeRequest>,
) -> axum::Json<SummarizeResponse> {
    // The extension popup consumes the body, not the status line, so every
    // failure is converted into an in-band error at this single point.
    match run_summarize(&state.settings, &body).await {
        Ok(summary) => axum::Json(SummarizeResponse::success(summary)),
        Err(e) if e.is_pre_dispatch() => {
            // Bad input or missing configuration, nothing was dispatched.
            tracing::info!("Rejected summarize request: {e}");
            axum::Json(SummarizeResponse::failure(e))
        }
        Err(e) => {
            tracing::warn!("Summarization failed: {e}");
            axum::Json(SummarizeResponse::failure(e))
        }
    }
}

async fn run_summarize(settings: &Settings, body: &SummarizeRequest) -> Result<String, AppError> {
    let provider = body
        .provider
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let model = body.model.as_deref().map(str::trim).filter(|m| !m.is_empty());

    let (Some(provider), Some(model)) = (provider, model) else {
        return Err(AppError::ValidationError(
            "Missing required fields: provider or model".to_string(),
        ));
    };
    let provider: Provider = provider.parse()?;

    // Reject unusable requests before touching credentials, so a missing key
    // is never reported for a request that could not run anyway. Supplied
    // text must already meet the pipeline's minimum length; a URL only has
    // to be present, its extracted content is validated downstream.
    let text = body.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let url = body.url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let usable = match (text, url) {
        (Some(text), _) => text.chars().count() >= MIN_TEXT_CHARS,
        (None, url) => url.is_some(),
    };
    if !usable {
        return Err(AppError::ValidationError(
            "No meaningful text content found to summarize".to_string(),
        ));
    }

    let input = SummarizeInput {
        text: body.text.clone(),
        url: body.url.clone(),
        instructions: body.instructions.clone(),
    };
    let extractor = ArticleExtractor::new()?;

    match provider {
        Provider::OpenAi | Provider::Groq => {
            let api_key = settings.resolve_api_key(provider, body.apikey.as_deref())?;
            let summarizer = ChatCompletionsClient::new(provider, &api_key, model)?;
            SummarizeService::new(extractor, summarizer).run(&input).await
        }
        Provider::Watsonx => {
            let access = settings.resolve_watsonx(&WatsonxOverrides {
                api_key: body.apikey.as_deref(),
                url: body.watsonx_url.as_deref(),
                project_id: body.project_id.as_deref(),
                space_id: body.space_id.as_deref(),
            })?;
            let summarizer = WatsonxClient::new(access, model)?;
            SummarizeService::new(extractor, summarizer).run(&input).await
        }
        Provider::Ollama => {
            let summarizer = OllamaClient::new(&settings.ollama.host, model)?;
            let service = SummarizeService::new(extractor, summarizer);
            match settings.ollama.mode {
                OllamaMode::Agentic => service.run_agentic(&input).await,
                OllamaMode::Fast => service.run(&input).await,
            }
        }
    }
}
