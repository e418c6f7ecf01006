//! HTTP contract tests for the Gemini backend against a mock server.

use std::sync::Arc;

use portfolio_core::milestones::{
    CompletionBackend, GeminiBackend, GenerationError, GenerationRequest, MilestoneGenerator,
};
use portfolio_core::models::ModelConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-3-flash-preview:generateContent";

fn generator_for(server: &MockServer) -> MilestoneGenerator {
    let config = ModelConfig::default().with_base_url(server.uri());
    let backend = GeminiBackend::with_api_key(&config, "test-key").unwrap();
    MilestoneGenerator::new(Arc::new(backend) as Arc<dyn CompletionBackend>, &config)
}

fn candidate_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_structured_request_and_successful_response() {
    let server = MockServer::start().await;
    let milestones = json!([
        {"title": "Regulatory Submission", "date": "2024-09-01", "status": "Completed", "owner": "Regulatory"},
        {"title": "Payer Negotiations", "date": "2025-03", "status": "In Progress", "owner": "Market Access",
         "description": "National formulary listings"},
        {"title": "Launch", "date": "2025-06-30", "status": "Planned", "owner": "Commercial"}
    ]);

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(&milestones.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let drafts = generator_for(&server)
        .generate_milestones("Immunology", "2025-06-30", "EMEA")
        .await;

    assert_eq!(drafts.len(), 3);
    assert_eq!(drafts[0].title, "Regulatory Submission");
    assert_eq!(drafts[1].description.as_deref(), Some("National formulary listings"));
    assert!(drafts.iter().all(|d| d.is_complete()));
}

#[tokio::test]
async fn test_server_error_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let drafts = generator
        .generate_milestones("Oncology", "2026-01-15", "APAC")
        .await;
    assert!(drafts.is_empty());

    let err = generator
        .try_generate(&GenerationRequest::new("Oncology", "2026-01-15", "APAC"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_error_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .try_generate(&GenerationRequest::new("Immunology", "2025-06-30", "EMEA"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Api(ref message) if message.contains("not valid")));
}

#[tokio::test]
async fn test_no_candidates_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let outcome = generator_for(&server)
        .try_generate(&GenerationRequest::new("Neuroscience", "2027-02-20", "EMEA"))
        .await
        .unwrap();
    assert!(outcome.empty_response);
    assert!(outcome.drafts.is_empty());
}

#[tokio::test]
async fn test_non_json_text_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text("not json")))
        .mount(&server)
        .await;

    let drafts = generator_for(&server)
        .generate_milestones("Oncology", "2026-01-15", "APAC")
        .await;
    assert!(drafts.is_empty());
}

#[tokio::test]
async fn test_zero_timeout_still_reaches_service() {
    let server = MockServer::start().await;
    let milestones = json!([
        {"title": "Launch", "date": "2025-06-30", "status": "Planned", "owner": "Commercial"}
    ]);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(&milestones.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModelConfig::default()
        .with_base_url(server.uri())
        .with_timeout_secs(0);
    let backend = GeminiBackend::with_api_key(&config, "test-key").unwrap();
    let generator = MilestoneGenerator::new(Arc::new(backend), &config);

    let outcome = generator
        .try_generate(&GenerationRequest::new("Immunology", "2025-06-30", "EMEA"))
        .await
        .unwrap();
    assert_eq!(outcome.drafts.len(), 1);
}
