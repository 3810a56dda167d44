//! Flow integration tests
//!
//! Flows and the requests they invoke live on disk; requests hit a local
//! mock server through the real transport.

use super::TestProject;
use req::variables::VariableLayer;
use req::workspace::LookupError;
use req::{Orchestrator, Outcome, RunError};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_flow(project: &TestProject, name: &str, flags: VariableLayer) -> Result<Value, RunError> {
    let workspace = project.workspace();
    let transport = project.transport();
    let orchestrator = Orchestrator::new(&workspace, &transport)
        .with_config(project.config().variables)
        .with_invocation(flags);

    match orchestrator.run(name).await? {
        Outcome::Completed { value, .. } => Ok(value),
        other => panic!("Expected {} to be a flow, got {:?}", name, other),
    }
}

async fn auth_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"user": "neo", "password": "redpill"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-123"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer t-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Neo"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(header("authorization", "Bearer t-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"theme": "green"})))
        .mount(&server)
        .await;

    server
}

fn auth_project(server: &MockServer, flow: &str) -> TestProject {
    let base = server.uri();
    TestProject::new("[variables]\nuser = neo\n")
        .with_file(
            "login.http",
            &format!(
                "POST {}/login HTTP/1.1\n\n{{\"user\": \"{{user}}\", \"password\": \"{{password}}\"}}\n",
                base
            ),
        )
        .with_file(
            "me.http",
            &format!("GET {}/me HTTP/1.1\nAuthorization: Bearer {{token}}\n", base),
        )
        .with_file(
            "settings.http",
            &format!("GET {}/settings HTTP/1.1\nAuthorization: Bearer {{token}}\n", base),
        )
        .with_file("session.flow", flow)
}

#[tokio::test]
async fn test_sequential_flow_threads_results() {
    let server = auth_server().await;
    let project = auth_project(
        &server,
        r#"
steps:
  - invoke: login
    bindResultAs: login
  - invoke: me
    overlay:
      token: "${login.body.token}"
    bindResultAs: me
complete:
  token: "${login.body.token}"
  name: "${me.body.name}"
  status: "${me.status}"
"#,
    );

    let flags: VariableLayer = [("password", "redpill")].into_iter().collect();
    let value = run_flow(&project, "session", flags).await.unwrap();

    assert_eq!(value, json!({"token": "t-123", "name": "Neo", "status": 200}));
}

#[tokio::test]
async fn test_parallel_branches_bind_each_result() {
    let server = auth_server().await;
    let project = auth_project(
        &server,
        r#"
steps:
  - invoke: login
    bind: login
  - parallel:
      - invoke: me
        overlay:
          token: "${login.body.token}"
        bind: me
      - invoke: settings
        overlay:
          token: "${login.body.token}"
        bind: settings
complete: "${me.body.name} likes ${settings.body.theme}"
"#,
    );

    let flags: VariableLayer = [("password", "redpill")].into_iter().collect();
    let value = run_flow(&project, "session", flags).await.unwrap();

    assert_eq!(value, json!("Neo likes green"));
}

#[tokio::test]
async fn test_nested_flow_overlay_precedence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let project = TestProject::new("[variables]\npage = 1\n")
        .with_file(
            "item.http",
            &format!("GET {}/items/{{page}} HTTP/1.1\n", server.uri()),
        )
        .with_file(
            "fetch.flow",
            "steps:\n  - invoke: item\n    bind: item\ncomplete: \"${item.body}\"\n",
        )
        .with_file(
            "outer.flow",
            "steps:\n  - invoke: fetch\n    overlay:\n      page: 3\n    bind: fetched\ncomplete:\n  fetched: \"${fetched}\"\n  page: \"${vars.page}\"\n",
        );

    let flags: VariableLayer = [("page", "2")].into_iter().collect();
    let value = run_flow(&project, "outer", flags).await.unwrap();

    // The outer flow sees the invocation layer; the nested one sees its overlay
    assert_eq!(value, json!({"fetched": {"id": 3}, "page": "2"}));
}

#[tokio::test]
async fn test_failure_halts_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let project = TestProject::new("")
        .with_file("broken.http", "TELEPORT https://example.com HTTP/1.1\n")
        .with_file("ping.http", &format!("GET {}/ping HTTP/1.1\n", server.uri()))
        .with_file("halts.flow", "steps:\n  - invoke: broken\n  - invoke: ping\n");

    let error = run_flow(&project, "halts", VariableLayer::new()).await.unwrap_err();

    assert_eq!(error.flow_trace(), vec!["halts"]);
    assert!(matches!(error.root_cause(), RunError::Parse { target, .. } if target == "broken"));
    assert!(error.to_string().starts_with("Flow halts aborted:"));
}

#[tokio::test]
async fn test_flow_cannot_reach_outside_request_dir() {
    let project = TestProject::new("")
        .with_file("escape.flow", "steps:\n  - invoke: ../.reqrc\n");

    let error = run_flow(&project, "escape", VariableLayer::new()).await.unwrap_err();
    assert!(matches!(
        error.root_cause(),
        RunError::Lookup(LookupError::InvalidName { .. })
    ));
}

#[tokio::test]
async fn test_unknown_target_suggests_similar_names() {
    let project = TestProject::new("")
        .with_file("register.http", "GET https://example.com HTTP/1.1\n")
        .with_file("register-admin.flow", "steps: []\n")
        .with_file("users.http", "GET https://example.com HTTP/1.1\n");

    match run_flow(&project, "register-user", VariableLayer::new()).await {
        Err(RunError::Lookup(LookupError::NotFound { name, suggestions })) => {
            assert_eq!(name, "register-user");
            assert_eq!(suggestions, vec!["register"]);
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}
