use std::time::Duration;

use newsboard_llm::{GeminiClient, GeminiConfig, GenerateRequest, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5));
    GeminiClient::new(config).unwrap()
}

#[tokio::test]
async fn test_generate_returns_first_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "Summarize this" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "A calm discussion." }], "role": "model" },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(GenerateRequest::new("Summarize this"))
        .await
        .unwrap();

    assert_eq!(response.text, "A calm discussion.");
    assert_eq!(response.model, "gemini-2.5-flash");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
}

#[tokio::test]
async fn test_generate_honours_model_override() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-lite:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(GenerateRequest::new("hi").with_model("gemini-2.5-flash-lite"))
        .await
        .unwrap();

    assert_eq!(response.text, "ok");
}

#[tokio::test]
async fn test_generate_fails_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(GenerateRequest::new("hi"))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("429"), "unexpected error: {}", message);
    assert!(message.contains("quota exceeded"));
}

#[tokio::test]
async fn test_generate_fails_without_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(GenerateRequest::new("hi"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no candidates"));
}
