pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod service;
pub mod testutil;
pub mod traits;

pub use config::{OllamaMode, Provider, Settings, WatsonxAccess, WatsonxOverrides, WatsonxScope};
pub use error::AppError;
pub use normalize::normalize;
pub use output::clean_output;
pub use service::{SummarizeInput, SummarizeService};
pub use traits::{Extractor, Refiner, Summarizer};
