use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use summer_core::Settings;
use summer_core::config::WatsonxSettings;
use summer_server::routes;
use summer_server::state::AppState;

fn test_app(settings: Settings) -> Router {
    routes::router(Arc::new(AppState { settings }))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn summarize_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn providers_reports_unconfigured_environment() {
    let app = test_app(Settings::default());

    let response = app
        .oneshot(Request::get("/providers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["openai"]["has_apikey"], false);
    assert_eq!(json["groq"]["has_apikey"], false);
    assert_eq!(json["watsonx"]["all_configured"], false);
    assert_eq!(json["ollama"]["has_apikey"], true);
}

#[tokio::test]
async fn providers_reports_configured_keys() {
    let settings = Settings {
        openai_api_key: Some("sk-test".into()),
        watsonx: WatsonxSettings {
            api_key: Some("k".into()),
            url: Some("https://us-south.ml.cloud.ibm.com".into()),
            project_id: Some("p".into()),
            space_id: None,
        },
        ..Settings::default()
    };
    let app = test_app(settings);

    let response = app
        .oneshot(Request::get("/providers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["openai"]["has_apikey"], true);
    assert_eq!(json["watsonx"]["has_apikey"], true);
    assert_eq!(json["watsonx"]["has_url"], true);
    assert_eq!(json["watsonx"]["has_project_id"], true);
    assert_eq!(json["watsonx"]["has_space_id"], false);
    assert_eq!(json["watsonx"]["all_configured"], true);
}

#[tokio::test]
async fn summarize_without_provider_or_model_is_in_band_error() {
    let app = test_app(Settings::default());

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "text": "Some article text that is certainly long enough."
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json.get("summary").is_none());
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Missing required fields: provider or model")
    );
}

#[tokio::test]
async fn summarize_with_unknown_provider_is_in_band_error() {
    let app = test_app(Settings::default());

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "provider": "claude",
            "model": "opus",
            "text": "Some article text that is certainly long enough."
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported provider: claude")
    );
}

#[tokio::test]
async fn summarize_without_content_fails_before_credentials() {
    // No API key is configured, yet the empty request must surface the
    // content problem, not the credential one.
    let app = test_app(Settings::default());

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "provider": "openai",
            "model": "gpt-4o-mini"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("No meaningful text content found to summarize"));
    assert!(!error.contains("API key"));
}

#[tokio::test]
async fn summarize_blank_text_and_url_counts_as_no_content() {
    let app = test_app(Settings::default());

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "provider": "ollama",
            "model": "llama3.2",
            "text": "   ",
            "url": ""
        })))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("No meaningful text content found to summarize")
    );
}

#[tokio::test]
async fn summarize_short_text_fails_validation_before_credentials() {
    // No API key is configured; the too-short text must be reported as the
    // problem, not the missing credential.
    let app = test_app(Settings::default());

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "provider": "openai",
            "model": "gpt-4o-mini",
            "text": "short"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("No meaningful text content found to summarize"));
    assert!(!error.contains("API key"));
}

#[tokio::test]
async fn summarize_without_api_key_is_config_error() {
    let app = test_app(Settings::default());

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "provider": "openai",
            "model": "gpt-4o-mini",
            "text": "Some article text that is certainly long enough."
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("openai API key is required")
    );
}

#[tokio::test]
async fn summarize_watsonx_without_scope_is_config_error() {
    let settings = Settings {
        watsonx: WatsonxSettings {
            api_key: Some("k".into()),
            url: Some("https://us-south.ml.cloud.ibm.com".into()),
            project_id: None,
            space_id: None,
        },
        ..Settings::default()
    };
    let app = test_app(settings);

    let response = app
        .oneshot(summarize_request(serde_json::json!({
            "provider": "watsonx",
            "model": "ibm/granite-13b-instruct-v2",
            "text": "Some article text that is certainly long enough."
        })))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("project_id or a space_id")
    );
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app(Settings::default());

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["paths"]["/summarize"].is_object());
    assert!(json["paths"]["/providers"].is_object());
}
