use crate::error::AppError;
use crate::normalize::normalize;
use crate::output::clean_output;
use crate::traits::{Extractor, Refiner, Summarizer};

/// Minimum trimmed input length accepted for summarization, in characters.
pub const MIN_TEXT_CHARS: usize = 20;

/// Minimum cleaned summary length returned to the caller, in characters.
pub const MIN_SUMMARY_CHARS: usize = 10;

/// Request-scoped input to the summarize pipeline. `text` wins over `url`
/// when both are present.
#[derive(Debug, Clone, Default)]
pub struct SummarizeInput {
    pub text: Option<String>,
    pub url: Option<String>,
    pub instructions: Option<String>,
}

/// Orchestrates one summarize call: resolve text → normalize → generate →
/// clean output.
///
/// Generic over the extractor and provider adapter via traits, enabling
/// dependency injection and testability without real HTTP or LLM calls.
pub struct SummarizeService<E, S>
where
    E: Extractor,
    S: Summarizer,
{
    extractor: E,
    summarizer: S,
}

impl<E, S> SummarizeService<E, S>
where
    E: Extractor,
    S: Summarizer,
{
    pub fn new(extractor: E, summarizer: S) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Run the pipeline with a single direct provider call.
    pub async fn run(&self, input: &SummarizeInput) -> Result<String, AppError> {
        let text = self.prepare(input).await?;
        let raw = self
            .summarizer
            .summarize(&text, input.instructions.as_deref())
            .await?;
        finish(&raw)
    }

    /// Resolve the effective text and normalize it.
    ///
    /// Extraction failures are non-fatal: they are logged and treated as
    /// "no content", escalating to a validation error only when nothing
    /// else is available.
    async fn prepare(&self, input: &SummarizeInput) -> Result<String, AppError> {
        let provided = input.text.as_deref().unwrap_or("").trim();

        let text = if !provided.is_empty() {
            provided.to_string()
        } else if let Some(url) = input.url.as_deref().filter(|u| !u.trim().is_empty()) {
            tracing::info!("Extracting content from {url}");
            match self.extractor.extract(url).await {
                Ok(extracted) => extracted,
                Err(e) => {
                    tracing::warn!("Content extraction failed for {url}: {e}");
                    String::new()
                }
            }
        } else {
            String::new()
        };

        if text.trim().chars().count() < MIN_TEXT_CHARS {
            return Err(AppError::ValidationError(
                "No meaningful text content found to summarize".into(),
            ));
        }

        let normalized = normalize(&text);
        tracing::info!(
            "Normalized {} chars of input to {} chars",
            text.len(),
            normalized.len()
        );
        Ok(normalized)
    }
}

impl<E, S> SummarizeService<E, S>
where
    E: Extractor,
    S: Summarizer + Refiner,
{
    /// Run the two-stage clean-then-summarize pipeline.
    ///
    /// The first pass asks the model to return cleaned text only; when that
    /// yields usable output it replaces the normalizer's result, otherwise
    /// the normalized text stands. Any failure at either stage degrades to
    /// the single direct call on the normalized text rather than surfacing
    /// an error.
    pub async fn run_agentic(&self, input: &SummarizeInput) -> Result<String, AppError> {
        let text = self.prepare(input).await?;
        let instructions = input.instructions.as_deref();

        let raw = match self.summarizer.refine(&text).await {
            Ok(refined) if refined.trim().chars().count() >= MIN_TEXT_CHARS => {
                match self.summarizer.summarize(refined.trim(), instructions).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!("Agentic summarize stage failed, falling back to fast path: {e}");
                        self.summarizer.summarize(&text, instructions).await?
                    }
                }
            }
            Ok(_) => {
                tracing::warn!("Agentic cleaning stage returned unusable output, falling back to fast path");
                self.summarizer.summarize(&text, instructions).await?
            }
            Err(e) => {
                tracing::warn!("Agentic cleaning stage failed, falling back to fast path: {e}");
                self.summarizer.summarize(&text, instructions).await?
            }
        };

        finish(&raw)
    }
}

/// Clean the raw completion and reject blank generations.
fn finish(raw: &str) -> Result<String, AppError> {
    let summary = clean_output(raw);
    if summary.chars().count() < MIN_SUMMARY_CHARS {
        return Err(AppError::EmptySummary);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    const ARTICLE: &str = "The committee voted on Tuesday to approve the new transit plan, \
        which allocates funding for two additional light rail lines and a bus corridor. \
        Construction is expected to begin next spring and finish within four years.";

    fn input_with_text(text: &str) -> SummarizeInput {
        SummarizeInput {
            text: Some(text.to_string()),
            ..SummarizeInput::default()
        }
    }

    #[tokio::test]
    async fn happy_path_returns_cleaned_summary() {
        let summarizer = MockSummarizer::new("Summary: The transit plan was approved with funding for rail and bus expansion.");
        let svc = SummarizeService::new(MockExtractor::new(""), summarizer.clone());

        let summary = svc.run(&input_with_text(ARTICLE)).await.unwrap();

        assert_eq!(
            summary,
            "The transit plan was approved with funding for rail and bus expansion."
        );
        assert!(summary.chars().count() > MIN_SUMMARY_CHARS);
        assert_eq!(summarizer.calls().len(), 1);
    }

    #[tokio::test]
    async fn summarizer_receives_normalized_text() {
        let summarizer = MockSummarizer::new("A perfectly reasonable summary.");
        let svc = SummarizeService::new(MockExtractor::new(""), summarizer.clone());

        let messy = format!("{ARTICLE}\n\n\n\nWe use cookies on this site");
        svc.run(&input_with_text(&messy)).await.unwrap();

        let calls = summarizer.calls();
        assert!(!calls[0].0.to_lowercase().contains("cookies"));
        assert!(!calls[0].0.contains("\n\n\n"));
    }

    #[tokio::test]
    async fn empty_text_and_no_url_fails_validation_without_any_call() {
        let extractor = MockExtractor::new("ignored");
        let summarizer = MockSummarizer::new("ignored");
        let svc = SummarizeService::new(extractor.clone(), summarizer.clone());

        let err = svc
            .run(&SummarizeInput {
                text: Some(String::new()),
                ..SummarizeInput::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(extractor.calls().len(), 0);
        assert_eq!(summarizer.calls().len(), 0);
    }

    #[tokio::test]
    async fn short_text_fails_validation() {
        let svc = SummarizeService::new(MockExtractor::new(""), MockSummarizer::new("ignored"));
        let err = svc.run(&input_with_text("too short")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn url_extraction_feeds_the_pipeline() {
        let extractor = MockExtractor::new(ARTICLE);
        let summarizer = MockSummarizer::new("A summary of the extracted page.");
        let svc = SummarizeService::new(extractor.clone(), summarizer.clone());

        let summary = svc
            .run(&SummarizeInput {
                url: Some("https://example.com/story".into()),
                ..SummarizeInput::default()
            })
            .await
            .unwrap();

        assert_eq!(summary, "A summary of the extracted page.");
        assert_eq!(extractor.calls(), vec!["https://example.com/story"]);
    }

    #[tokio::test]
    async fn provided_text_wins_over_url() {
        let extractor = MockExtractor::new("extracted page text that should not be used");
        let summarizer = MockSummarizer::new("A summary of the provided text.");
        let svc = SummarizeService::new(extractor.clone(), summarizer.clone());

        svc.run(&SummarizeInput {
            text: Some(ARTICLE.into()),
            url: Some("https://example.com".into()),
            ..SummarizeInput::default()
        })
        .await
        .unwrap();

        assert_eq!(extractor.calls().len(), 0);
        assert!(summarizer.calls()[0].0.contains("transit plan"));
    }

    #[tokio::test]
    async fn extraction_failure_is_swallowed_and_escalates_to_validation() {
        let extractor = MockExtractor::with_error(AppError::HttpError("connection refused".into()));
        let summarizer = MockSummarizer::new("ignored");
        let svc = SummarizeService::new(extractor, summarizer.clone());

        let err = svc
            .run(&SummarizeInput {
                url: Some("https://example.com".into()),
                ..SummarizeInput::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(summarizer.calls().len(), 0);
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let summarizer = MockSummarizer::with_error(AppError::ProviderError {
            provider: "groq",
            message: "overloaded".into(),
            status_code: 503,
        });
        let svc = SummarizeService::new(MockExtractor::new(""), summarizer);

        let err = svc.run(&input_with_text(ARTICLE)).await.unwrap_err();
        assert!(matches!(err, AppError::ProviderError { .. }));
    }

    #[tokio::test]
    async fn blank_completion_is_rejected() {
        let summarizer = MockSummarizer::new("<think>only reasoning, no prose</think>");
        let svc = SummarizeService::new(MockExtractor::new(""), summarizer);

        let err = svc.run(&input_with_text(ARTICLE)).await.unwrap_err();
        assert!(matches!(err, AppError::EmptySummary));
    }

    #[tokio::test]
    async fn instructions_are_forwarded() {
        let summarizer = MockSummarizer::new("A bulleted summary, as requested.");
        let svc = SummarizeService::new(MockExtractor::new(""), summarizer.clone());

        svc.run(&SummarizeInput {
            text: Some(ARTICLE.into()),
            instructions: Some("Use bullet points".into()),
            ..SummarizeInput::default()
        })
        .await
        .unwrap();

        assert_eq!(summarizer.calls()[0].1.as_deref(), Some("Use bullet points"));
    }

    // ---- agentic path ----

    #[tokio::test]
    async fn agentic_uses_refined_text_when_usable() {
        let agent = MockAgent::new(
            Ok("The committee approved the transit plan on Tuesday, funding rail and bus expansion."),
            "A summary built from the refined text.",
        );
        let svc = SummarizeService::new(MockExtractor::new(""), agent.clone());

        let summary = svc.run_agentic(&input_with_text(ARTICLE)).await.unwrap();

        assert_eq!(summary, "A summary built from the refined text.");
        assert_eq!(agent.refine_calls(), 1);
        let calls = agent.summarize_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.starts_with("The committee approved"));
    }

    #[tokio::test]
    async fn agentic_cleaning_failure_falls_back_to_fast_path() {
        let agent = MockAgent::new(
            Err(AppError::Timeout(90)),
            "A summary produced by the fast path.",
        );
        let svc = SummarizeService::new(MockExtractor::new(""), agent.clone());

        let summary = svc.run_agentic(&input_with_text(ARTICLE)).await.unwrap();

        assert_eq!(summary, "A summary produced by the fast path.");
        // The fallback call received the deterministic normalizer's output.
        assert!(agent.summarize_calls()[0].0.contains("transit plan"));
    }

    #[tokio::test]
    async fn agentic_unusable_refinement_falls_back_to_fast_path() {
        let agent = MockAgent::new(Ok("   \n  "), "A summary produced by the fast path.");
        let svc = SummarizeService::new(MockExtractor::new(""), agent.clone());

        let summary = svc.run_agentic(&input_with_text(ARTICLE)).await.unwrap();

        assert_eq!(summary, "A summary produced by the fast path.");
        assert_eq!(agent.summarize_calls().len(), 1);
    }

    #[tokio::test]
    async fn agentic_second_stage_failure_falls_back_to_fast_path() {
        let agent = MockAgent::with_summarize_responses(
            Ok("Refined text long enough to be considered usable for the pipeline."),
            vec![
                Err(AppError::ProviderError {
                    provider: "ollama",
                    message: "model crashed".into(),
                    status_code: 500,
                }),
                Ok("A summary from the fallback call.".to_string()),
            ],
        );
        let svc = SummarizeService::new(MockExtractor::new(""), agent.clone());

        let summary = svc.run_agentic(&input_with_text(ARTICLE)).await.unwrap();

        assert_eq!(summary, "A summary from the fallback call.");
        assert_eq!(agent.summarize_calls().len(), 2);
    }
}
