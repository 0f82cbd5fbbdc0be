use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Summer API",
        version = "0.3.0",
        description = "Summarization relay for the Summer browser extension."
    ),
    paths(crate::routes::get_providers, crate::routes::summarize),
    components(schemas(
        crate::dto::SummarizeRequest,
        crate::dto::SummarizeResponse,
        crate::dto::ProvidersResponse,
        crate::dto::KeyStatus,
        crate::dto::WatsonxStatus,
    )),
    tags(
        (name = "providers", description = "Provider configuration status"),
        (name = "summarize", description = "Text and page summarization"),
    )
)]
pub struct ApiDoc;
