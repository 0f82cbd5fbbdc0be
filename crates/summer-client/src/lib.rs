pub mod article;
pub mod providers;

pub use article::ArticleExtractor;
pub use providers::{ChatCompletionsClient, OllamaClient, WatsonxClient};
