use std::future::Future;

use crate::error::AppError;

/// Fetches a URL and returns its best-guess main textual content.
pub trait Extractor: Send + Sync + Clone {
    fn extract(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// A provider adapter: turns text (plus optional caller instructions) into a
/// raw completion via a single direct call.
pub trait Summarizer: Send + Sync + Clone {
    fn summarize(
        &self,
        text: &str,
        instructions: Option<&str>,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// First-pass text cleanup performed by the model itself (boilerplate
/// removal, dedup). Used by the agentic local-inference path; the
/// deterministic normalizer remains the safe fallback.
pub trait Refiner: Send + Sync + Clone {
    fn refine(&self, text: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}
