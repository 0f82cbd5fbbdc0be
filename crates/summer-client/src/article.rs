use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use summer_core::error::AppError;
use summer_core::traits::Extractor;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) Chrome/120.0.0.0 Summer/0.3";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Likely article containers, tried in order. The first candidate whose
/// text exceeds [`MIN_ARTICLE_WORDS`] wins; otherwise every paragraph
/// element is concatenated as a fallback.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "section",
    r#"div[class*="content"]"#,
    r#"div[class*="article"]"#,
];

const MIN_ARTICLE_WORDS: usize = 100;

/// Fetches a web page and extracts its best-guess main article text.
///
/// Heuristic, not a readability engine: a fixed selector table plus a
/// paragraph fallback covers the common article layouts the extension
/// encounters.
#[derive(Clone)]
pub struct ArticleExtractor {
    client: Client,
    timeout_secs: u64,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: FETCH_TIMEOUT.as_secs(),
        })
    }
}

impl Extractor for ArticleExtractor {
    async fn extract(&self, url: &str) -> Result<String, AppError> {
        validate_scheme(url)?;

        let response = self.client.get(url).send().await.map_err(|e| {
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
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;

        let text = select_content(&html);
        tracing::info!("Extracted {} chars of article text from {url}", text.len());
        Ok(text)
    }
}

/// Only http(s) pages are fetched.
fn validate_scheme(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::HttpError(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}

/// Pick the main textual content out of an HTML document.
///
/// Pure and deterministic; unit-tested on static documents.
pub fn select_content(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = element_text(&element);
            if text.split_whitespace().count() > MIN_ARTICLE_WORDS {
                return text;
            }
        }
    }

    // Fallback: concatenate every paragraph.
    let Ok(paragraphs) = Selector::parse("p") else {
        return String::new();
    };
    let text = document
        .select(&paragraphs)
        .map(|p| element_text(&p))
        .collect::<Vec<_>>()
        .join(" ");
    text.trim().to_string()
}

/// Element text with whitespace normalized to single spaces.
fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
