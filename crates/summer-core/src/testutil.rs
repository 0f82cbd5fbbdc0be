//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::traits::{Extractor, Refiner, Summarizer};

/// A recorded summarize call: (text, instructions).
pub type SummarizeCall = (String, Option<String>);

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that returns a configurable result and records the URLs
/// it was asked to fetch.
#[derive(Clone)]
pub struct MockExtractor {
    response: Arc<Mutex<Option<Result<String, AppError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(Ok(text.to_string())))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(Err(error)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Extractor for MockExtractor {
    async fn extract(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.response.lock().unwrap().take() {
            Some(result) => result,
            None => Ok(String::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockSummarizer
// ---------------------------------------------------------------------------

/// Mock provider adapter with a queue of responses and call recording.
/// When the queue is exhausted, a default completion is returned.
#[derive(Clone)]
pub struct MockSummarizer {
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    calls: Arc<Mutex<Vec<SummarizeCall>>>,
}

impl MockSummarizer {
    pub fn new(completion: &str) -> Self {
        Self::with_responses(vec![Ok(completion.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<SummarizeCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str, instructions: Option<&str>) -> Result<String, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), instructions.map(str::to_string)));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("A default mock completion of sufficient length.".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockAgent
// ---------------------------------------------------------------------------

/// Mock adapter implementing both `Summarizer` and `Refiner`, for
/// fault-injection against the agentic two-stage pipeline.
#[derive(Clone)]
pub struct MockAgent {
    refine_response: Arc<Mutex<Option<Result<String, AppError>>>>,
    refine_calls: Arc<Mutex<usize>>,
    summarizer: MockSummarizer,
}

impl MockAgent {
    pub fn new(refine: Result<&str, AppError>, completion: &str) -> Self {
        Self::with_summarize_responses(refine, vec![Ok(completion.to_string())])
    }

    pub fn with_summarize_responses(
        refine: Result<&str, AppError>,
        responses: Vec<Result<String, AppError>>,
    ) -> Self {
        Self {
            refine_response: Arc::new(Mutex::new(Some(refine.map(str::to_string)))),
            refine_calls: Arc::new(Mutex::new(0)),
            summarizer: MockSummarizer::with_responses(responses),
        }
    }

    pub fn refine_calls(&self) -> usize {
        *self.refine_calls.lock().unwrap()
    }

    pub fn summarize_calls(&self) -> Vec<SummarizeCall> {
        self.summarizer.calls()
    }
}

impl Summarizer for MockAgent {
    async fn summarize(&self, text: &str, instructions: Option<&str>) -> Result<String, AppError> {
        self.summarizer.summarize(text, instructions).await
    }
}

impl Refiner for MockAgent {
    async fn refine(&self, _text: &str) -> Result<String, AppError> {
        *self.refine_calls.lock().unwrap() += 1;
        match self.refine_response.lock().unwrap().take() {
            Some(result) => result,
            None => Ok(String::new()),
        }
    }
}
