use leafwatch::ReasoningError;
use leafwatch::config::HostedSettings;
use leafwatch::reasoning::{EncodedImage, HostedBackend, ReasoningBackend};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn backend(server: &MockServer) -> HostedBackend {
    let settings = HostedSettings {
        base_url: server.uri(),
        api_key: Some("test-key".into()),
        ..HostedSettings::default()
    };
    HostedBackend::new(&settings, None).unwrap()
}

fn reply(parts: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": parts }, "finishReason": "STOP" }
        ]
    })
}

#[tokio::test]
async fn validation_sends_prompt_and_inline_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": leafwatch::reasoning::prompts::VALIDATION_PROMPT },
                    { "inline_data": { "mime_type": "image/jpeg", "data": "aGVsbG8=" } }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(json!([{ "text": "Yes\n" }]))))
        .expect(1)
        .mount(&server)
        .await;

    let answer = backend(&server)
        .validate_image(&EncodedImage::jpeg("aGVsbG8=".into()))
        .await
        .unwrap();
    assert_eq!(answer, "Yes");
}

#[tokio::test]
async fn reply_parts_are_concatenated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply(json!([{ "text": "The soil drains fast. " }, { "text": "Water daily." }]))),
        )
        .mount(&server)
        .await;

    let answer = backend(&server).explain("prompt").await.unwrap();
    assert_eq!(answer, "The soil drains fast. Water daily.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_candidates_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = backend(&server).explain("prompt").await.unwrap_err();
    assert!(matches!(err, ReasoningError::Malformed(_)));
}

#[tokio::test]
async fn rejected_key_is_a_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let err = backend(&server).explain("prompt").await.unwrap_err();
    assert!(matches!(err, ReasoningError::Status { status: 403, .. }));
}

#[test]
fn backend_needs_an_api_key() {
    let settings = HostedSettings::default();
    assert!(matches!(
        HostedBackend::new(&settings, None),
        Err(ReasoningError::Client(_))
    ));
}
