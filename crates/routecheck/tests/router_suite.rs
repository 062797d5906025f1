//! Suite cases against a mock OpenAI-compatible router.
//!
//! Run with: cargo test -p routecheck --test router_suite

#![allow(clippy::unwrap_used, clippy::expect_used)]

use routecheck::suite::cases;
use routecheck::{
    CaseKind, LlmClient, MemoryReporter, RejectionVerdict, SuiteConfig, SuiteRunner, Tally, Tone,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/v1/chat/completions";

fn client_for(server: &MockServer) -> LlmClient {
    LlmClient::new(format!("{}/v1", server.uri()), "not-used").unwrap()
}

fn completion(model: &str, content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1699000000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 21, "completion_tokens": 9, "total_tokens": 30}
    })
}

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::from(
        "data: {\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
    );
    for fragment in fragments {
        let chunk = json!({
            "object": "chat.completion.chunk",
            "choices": [{"index": 0, "delta": {"content": fragment}}]
        });
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str(
        "data: {\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
    );
    body.push_str("data: [DONE]\n\n");
    body
}

fn rejection() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": {
            "message": "Multiple completions (n>1) are not supported",
            "type": "invalid_request_error"
        }
    }))
}

#[tokio::test]
async fn test_basic_completion_prints_all_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(header("authorization", "Bearer not-used"))
        .and(body_partial_json(json!({"model": "gpt-4", "max_tokens": 50})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("claude-sonnet-4", "Hello from routecheck!")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    let passed = cases::basic_completion(&client_for(&server), &mut reporter).await;

    assert!(passed);
    assert!(reporter.contains(Tone::Success, "Request successful!"));
    assert!(reporter.contains(Tone::Info, "Model: claude-sonnet-4"));
    assert!(reporter.contains(Tone::Notice, "Content: Hello from routecheck!"));
    assert!(reporter.contains(Tone::Info, "Finish reason: stop"));
    assert!(reporter.contains(
        Tone::Info,
        "Tokens - Prompt: 21, Completion: 9, Total: 30"
    ));
}

#[tokio::test]
async fn test_basic_completion_without_usage_still_passes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4",
            "choices": [{"message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}]
        })))
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(cases::basic_completion(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Notice, "usage not reported"));
}

#[tokio::test]
async fn test_basic_completion_empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"model": "gpt-4", "choices": []})),
        )
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(!cases::basic_completion(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Failure, "Malformed response"));
}

#[tokio::test]
async fn test_basic_completion_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(!cases::basic_completion(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Failure, "FAILED: Error code: 502 - Bad Gateway"));
}

#[tokio::test]
async fn test_streaming_prints_fragments_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"stream": true, "max_tokens": 50})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["1", "\n", "2\n", "", "3"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    let passed = cases::streaming_completion(&client_for(&server), &mut reporter).await;

    assert!(passed);
    assert_eq!(reporter.streamed(), "1\n2\n3");
    assert_eq!(reporter.fragments().len(), 4);
    assert!(reporter.contains(Tone::Success, "Received 4 chunks"));
}

#[tokio::test]
async fn test_streaming_http_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "OpenAI endpoint not enabled"}
        })))
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(!cases::streaming_completion(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Failure, "OpenAI endpoint not enabled"));
    assert!(reporter.streamed().is_empty());
}

#[tokio::test]
async fn test_streaming_mid_stream_error_fails() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"1\"}}]}\n\n",
        "data: {\"error\":{\"message\":\"upstream overloaded\",\"type\":\"overloaded_error\"}}\n\n",
    );
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(!cases::streaming_completion(&client_for(&server), &mut reporter).await);
    assert_eq!(reporter.streamed(), "1");
    assert!(reporter.contains(Tone::Failure, "Stream error: upstream overloaded"));
}

#[tokio::test]
async fn test_model_mapping_reports_each_model_and_passes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"model": "gpt-5"})))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "model gpt-5 not found"}
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"max_tokens": 10})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("claude-haiku", "hi")),
        )
        .mount(&server)
        .await;

    let models: Vec<String> = routecheck::DEFAULT_MODELS
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut reporter = MemoryReporter::new();
    let passed = cases::model_mapping(&client_for(&server), &models, &mut reporter).await;

    assert!(passed);
    let successes = reporter.with_tone(Tone::Success);
    let failures = reporter.with_tone(Tone::Failure);
    assert_eq!(successes.len(), 4);
    assert_eq!(failures.len(), 1);
    assert!(successes
        .iter()
        .any(|l| l.contains("o1-mini → Success (returns: claude-haiku)")));
    assert!(failures[0].contains("gpt-5 → FAILED"));
    assert!(failures[0].contains("model gpt-5 not found"));
}

#[tokio::test]
async fn test_probe_model_echoes_server_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("claude-opus", "hi")))
        .mount(&server)
        .await;

    let probe = cases::probe_model(&client_for(&server), "gpt-4o").await;
    assert_eq!(probe.requested, "gpt-4o");
    assert_eq!(probe.outcome, Ok("claude-opus".to_string()));
}

#[tokio::test]
async fn test_system_messages_sent_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "system", "content": "You respond concisely."},
                {"role": "user", "content": "What is 2+2?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("gpt-4", "4")))
        .expect(1)
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(cases::system_messages(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Success, "Multiple system messages handled!"));
    assert!(reporter.contains(Tone::Notice, "Response: 4"));
}

#[tokio::test]
async fn test_unsupported_feature_expected_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"n": 2, "model": "gpt-4"})))
        .respond_with(rejection())
        .expect(1)
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(cases::unsupported_feature(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Success, "Correctly rejected n > 1"));
    assert!(reporter.contains(Tone::Info, "Multiple completions (n>1) are not supported"));
}

#[tokio::test]
async fn test_unsupported_feature_accepted_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("gpt-4", "Hello")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        cases::rejection_verdict(&client).await,
        RejectionVerdict::Accepted
    );

    let mut reporter = MemoryReporter::new();
    // Informational: the case still counts as passed.
    assert!(cases::unsupported_feature(&client, &mut reporter).await);
    assert!(reporter.contains(Tone::Failure, "Should have raised an error for n > 1"));
}

#[tokio::test]
async fn test_unsupported_feature_wrong_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "max_tokens too large"}
        })))
        .mount(&server)
        .await;

    let mut reporter = MemoryReporter::new();
    assert!(cases::unsupported_feature(&client_for(&server), &mut reporter).await);
    assert!(reporter.contains(Tone::Failure, "Wrong error: Error code: 400 - max_tokens too large"));
}

#[tokio::test]
async fn test_full_suite_all_pass() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"n": 2})))
        .respond_with(rejection())
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["1\n", "2\n", "3"]), "text/event-stream"),
        )
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("claude-sonnet-4", "ok")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "list", "data": []})))
        .mount(&server)
        .await;

    let config = SuiteConfig::new()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_timeout(Duration::from_secs(10));
    let runner = SuiteRunner::new(config).unwrap();
    let mut reporter = MemoryReporter::new();

    let report = runner.run(&mut reporter).await;

    assert_eq!(report.tally, Tally { passed: 5, failed: 0 });
    let kinds: Vec<CaseKind> = report.results.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, CaseKind::ALL);
    assert!(reporter.contains(Tone::Info, "Health check passed"));
    assert!(reporter.contains(Tone::Success, "Correctly rejected n > 1"));
    assert!(reporter.contains(Tone::Success, "All tests passed!"));
    assert_eq!(reporter.streamed(), "1\n2\n3");
}

#[tokio::test]
async fn test_full_suite_server_errors_do_not_stop_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "router exploded"}
        })))
        .mount(&server)
        .await;

    let config = SuiteConfig::new()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_health_check(false);
    let runner = SuiteRunner::new(config).unwrap();
    let mut reporter = MemoryReporter::new();

    let report = runner.run(&mut reporter).await;

    // The sweep and the rejection check are informational and always pass.
    assert_eq!(report.tally, Tally { passed: 2, failed: 3 });
    assert_eq!(report.tally.total(), CaseKind::ALL.len());
    assert_eq!(report.results.len(), 5);
    assert!(reporter.contains(Tone::Failure, "3 test(s) failed"));
    assert!(reporter.contains(Tone::Failure, "Wrong error"));
    let requests = server.received_requests().await.unwrap();
    // basic + stream + 5 models + system + n=2
    assert_eq!(requests.len(), 9);
}

#[tokio::test]
async fn test_health_check_falls_back_to_health_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).health_check().await.unwrap());
}

#[tokio::test]
async fn test_health_check_fails_when_nothing_answers() {
    let server = MockServer::start().await;

    let err = client_for(&server).health_check().await.unwrap_err();
    assert!(err.to_string().starts_with("Health check failed"));

    let mut reporter = MemoryReporter::new();
    let runner = SuiteRunner::with_client(
        SuiteConfig::new().with_models(["gpt-4"]),
        client_for(&server),
    );
    let report = runner.run(&mut reporter).await;
    assert!(reporter.contains(Tone::Warning, "proceeding anyway"));
    assert_eq!(report.tally.total(), 5);
}

#[tokio::test]
async fn test_configured_timeout_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("gpt-4", "late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = SuiteConfig::new()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_timeout(Duration::from_millis(200));
    let client = LlmClient::from_config(&config).unwrap();
    let mut reporter = MemoryReporter::new();

    assert!(!cases::basic_completion(&client, &mut reporter).await);
    assert!(reporter.contains(Tone::Failure, "FAILED: Connection error"));
}
