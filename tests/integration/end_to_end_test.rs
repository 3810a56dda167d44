//! End-to-end tests for single requests
//!
//! Each test writes a project to disk, points its request documents at a
//! local mock server, and runs them through the orchestrator and the real
//! reqwest transport.

use super::TestProject;
use req::executor::TransportError;
use req::models::Body;
use req::output::{render_exchange, OutputOptions};
use req::variables::VariableLayer;
use req::{Orchestrator, Outcome, RunError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_request(project: &TestProject, name: &str, flags: VariableLayer) -> Result<Outcome, RunError> {
    let workspace = project.workspace();
    let transport = project.transport();
    let orchestrator = Orchestrator::new(&workspace, &transport)
        .with_config(project.config().variables)
        .with_invocation(flags);
    orchestrator.run(name).await
}

fn expect_response(outcome: Outcome) -> req::flow::Exchange {
    match outcome {
        Outcome::Response(exchange) => exchange,
        other => panic!("Expected a response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_flags_override_reqrc_variables() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 2, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let project = TestProject::new("[variables]\npage = 1\nkey = secret\n").with_file(
        "users.http",
        &format!(
            "# list users\nGET {}/api/users?page={{page|1}} HTTP/1.1\nX-Api-Key: {{key}}\n",
            server.uri()
        ),
    );

    let flags: VariableLayer = [("page", "2")].into_iter().collect();
    let exchange = expect_response(run_request(&project, "users", flags).await.unwrap());

    assert_eq!(exchange.request.url, format!("{}/api/users?page=2", server.uri()));
    assert_eq!(exchange.result.status, 200);
    assert_eq!(exchange.result.body, Body::Json(json!({"page": 2, "data": []})));
}

#[tokio::test]
async fn test_jsonc_body_is_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "morpheus", "job": "mentor"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "42"})))
        .expect(1)
        .mount(&server)
        .await;

    let project = TestProject::new("[variables]\nname = morpheus\n").with_file(
        "create.http",
        &format!(
            "POST {}/api/users HTTP/1.1\nContent-Type: text/plain\n\n{{\n  // who\n  \"name\": \"{{name}}\",\n  \"job\": \"mentor\",\n}}\n",
            server.uri()
        ),
    );

    let exchange = expect_response(run_request(&project, "create", VariableLayer::new()).await.unwrap());

    assert_eq!(exchange.result.status, 201);
    assert_eq!(exchange.result.status_text(), "Created");
    assert_eq!(exchange.request.headers["Content-Type"], "application/json");
}

#[tokio::test]
async fn test_get_body_is_dropped_with_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let project = TestProject::new("").with_file(
        "search.http",
        &format!("GET {}/search HTTP/1.1\n\n{{\"q\": \"neo\"}}\n", server.uri()),
    );

    let exchange = expect_response(run_request(&project, "search", VariableLayer::new()).await.unwrap());
    assert_eq!(exchange.notices.len(), 1);
    assert_eq!(exchange.notices[0].to_string(), "Note: body ignored for GET request");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_raw_body_and_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Trace", "abc")
                .set_body_string("no such user"),
        )
        .mount(&server)
        .await;

    let project = TestProject::new("").with_file(
        "remove.http",
        &format!("DELETE {}/api/users/{{id}} HTTP/1.1\n", server.uri()),
    );

    let flags: VariableLayer = [("id", "7")].into_iter().collect();
    let exchange = expect_response(run_request(&project, "remove", flags).await.unwrap());

    assert_eq!(exchange.result.status, 404);
    assert!(!exchange.result.is_success());
    assert_eq!(exchange.result.body, Body::Raw("no such user".to_string()));
    assert_eq!(exchange.result.headers.get("x-trace").map(String::as_str), Some("abc"));

    let rendered = render_exchange(&exchange, &OutputOptions::plain());
    assert!(rendered.contains("Status: 404 Not Found"));
    assert!(rendered.contains("x-trace: abc"));
    assert!(rendered.contains("    no such user\n"));
}

#[tokio::test]
async fn test_json_output_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let project = TestProject::new("")
        .with_file("ping.http", &format!("GET {}/ping HTTP/1.1\n", server.uri()));

    let exchange = expect_response(run_request(&project, "ping", VariableLayer::new()).await.unwrap());
    let options = OutputOptions {
        json: true,
        ..OutputOptions::plain()
    };
    let line = render_exchange(&exchange, &options);

    assert_eq!(line.lines().count(), 1);
    let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed["status"], 200);
    assert_eq!(parsed["body"], json!({"ok": true}));
    assert_eq!(parsed["headers"]["content-type"], "application/json");
}

#[tokio::test]
async fn test_timeout_from_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let project = TestProject::new("[settings]\ntimeout = 1\n")
        .with_file("slow.http", &format!("GET {}/slow HTTP/1.1\n", server.uri()));

    let error = run_request(&project, "slow", VariableLayer::new()).await.unwrap_err();
    assert!(matches!(
        error,
        RunError::Transport {
            source: TransportError::Timeout,
            ..
        }
    ));
}

#[tokio::test]
async fn test_parse_error_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let project = TestProject::new("").with_file(
        "broken.http",
        &format!("GET {}/ping HTTP/3.0\n", server.uri()),
    );

    match run_request(&project, "broken", VariableLayer::new()).await {
        Err(RunError::Parse { target, source }) => {
            assert_eq!(target, "broken");
            assert_eq!(source.line(), 1);
        }
        other => panic!("Expected a parse error, got {:?}", other),
    }
}
