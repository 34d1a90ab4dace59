use codegen_preview::driver::Driver;
use codegen_preview::format::Format;
use codegen_preview::orchestrator::Mode;
use codegen_preview::service::http::HttpService;
use codegen_preview::service::{CodegenService, GenerationRequest, ServiceError, FALLBACK_ERROR_MESSAGE};
use codegen_preview::workflow::WorkflowDefinition;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEFAULT_BASE: &str = "https://forty-needles-draw.loca.lt";

fn service(server: &MockServer) -> Arc<HttpService> {
    Arc::new(HttpService::new(server.uri(), None).unwrap())
}

#[tokio::test]
async fn test_startup_fetches_curl_with_default_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .and(body_partial_json(json!({
            "language": "curl",
            "base_url": DEFAULT_BASE
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "curl -X POST ...",
            "payload": {"user_email": "placeholder"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut driver = Driver::start(
        service(&mock_server),
        WorkflowDefinition::sample(),
        Format::Curl,
        DEFAULT_BASE,
    );
    assert!(driver.state().is_loading());

    let state = driver.settle().await;
    assert!(matches!(state.mode, Mode::Success(_)));
    assert_eq!(state.displayed_text(), "curl -X POST ...");
    assert_eq!(
        state.displayed_payload(),
        Some(&json!({"user_email": "placeholder"}))
    );
}

#[tokio::test]
async fn test_request_body_forwards_base_url_and_workflow() {
    let mock_server = MockServer::start().await;

    let expected = json!({
        "workflow": serde_json::to_value(WorkflowDefinition::sample()).unwrap(),
        "language": "python",
        "base_url": "https://example.com"
    });

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .and(body_json(expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "import requests",
            "payload": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let svc = service(&mock_server);
    let result = svc
        .generate(&GenerationRequest {
            workflow: WorkflowDefinition::sample(),
            language: Format::Python,
            base_url: "https://example.com".into(),
        })
        .await
        .unwrap();
    assert_eq!(result.code, "import requests");
}

#[tokio::test]
async fn test_service_detail_is_shown_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad workflow"})))
        .mount(&mock_server)
        .await;

    let mut driver = Driver::start(
        service(&mock_server),
        WorkflowDefinition::sample(),
        Format::Js,
        DEFAULT_BASE,
    );
    let state = driver.settle().await;
    assert_eq!(state.error_message(), Some("bad workflow"));
    assert!(state.displayed_payload().is_none());
}

#[tokio::test]
async fn test_confirm_new_base_url_then_server_error_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .and(body_partial_json(json!({"base_url": "http://x"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "curl",
            "payload": {"a": 1}
        })))
        .mount(&mock_server)
        .await;

    let mut driver = Driver::start(
        service(&mock_server),
        WorkflowDefinition::sample(),
        Format::Curl,
        DEFAULT_BASE,
    );
    assert!(driver.settle().await.result().is_some());

    driver.update_base_url("http://x");
    driver.confirm_configuration();
    assert!(driver.state().is_loading());

    let state = driver.settle().await;
    assert_eq!(state.error_message(), Some(FALLBACK_ERROR_MESSAGE));
    assert!(state.displayed_payload().is_none());
}

#[tokio::test]
async fn test_unreachable_service_uses_fallback() {
    // Nothing listens on port 1.
    let svc = Arc::new(HttpService::new("http://127.0.0.1:1", Some(Duration::from_secs(5))).unwrap());
    let err = svc
        .generate(&GenerationRequest {
            workflow: WorkflowDefinition::sample(),
            language: Format::Curl,
            base_url: DEFAULT_BASE.into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));

    let mut driver = Driver::start(svc, WorkflowDefinition::sample(), Format::Curl, DEFAULT_BASE);
    assert_eq!(
        driver.settle().await.error_message(),
        Some(FALLBACK_ERROR_MESSAGE)
    );
}

#[tokio::test]
async fn test_success_without_code_is_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"payload": {}})))
        .mount(&mock_server)
        .await;

    let mut driver = Driver::start(
        service(&mock_server),
        WorkflowDefinition::sample(),
        Format::Ts,
        DEFAULT_BASE,
    );
    assert_eq!(
        driver.settle().await.error_message(),
        Some(FALLBACK_ERROR_MESSAGE)
    );
}

#[tokio::test]
async fn test_slow_earlier_response_does_not_overwrite_newer_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .and(body_partial_json(json!({"language": "curl"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "curl code", "payload": {}}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/generate-code"))
        .and(body_partial_json(json!({"language": "ts"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "ts code", "payload": {}})))
        .mount(&mock_server)
        .await;

    let mut driver = Driver::start(
        service(&mock_server),
        WorkflowDefinition::sample(),
        Format::Curl,
        DEFAULT_BASE,
    );
    driver.select_format(Format::Ts);

    assert_eq!(driver.settle().await.displayed_text(), "ts code");

    // Drain the slow cURL response; it arrives last but was issued first.
    while driver.next_completion().await.is_some() {}
    assert_eq!(driver.state().displayed_text(), "ts code");
    assert_eq!(driver.state().selected_format, Format::Ts);
}
