//! HTTP gateway against a local backend

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;
use workspace_browser::backend::{Args, BackendError, BackendGateway, HttpGateway, TimeoutGateway};
use workspace_browser::ui::EntryKind;
use workspace_browser::{Config, Coordinator};

use super::common::fixtures::{dir_json, file_json, repository_json, workspace_json};

const REPO: Uuid = Uuid::from_u128(1);
const WORKSPACE: Uuid = Uuid::from_u128(2);

async fn invoke(Path(command): Path<String>, Json(args): Json<Value>) -> Response {
    match command.as_str() {
        "get_repositories" => Json(json!([repository_json(
            REPO,
            "app",
            vec![workspace_json(WORKSPACE, REPO, "main")]
        )]))
        .into_response(),
        "get_workspace_files" => Json(json!([dir_json("src", vec![file_json("main.rs")])])).into_response(),
        "read_file_content" => match args["filePath"].as_str() {
            Some("src/main.rs") => Json(json!("fn main() {}\n")).into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!("File not found"))).into_response(),
        },
        "clone_repository" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid repository URL" })),
        )
            .into_response(),
        "delete_workspace" => StatusCode::OK.into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK.into_response()
        }
        _ => (StatusCode::NOT_FOUND, "unknown command").into_response(),
    }
}

async fn spawn_backend() -> SocketAddr {
    let app = Router::new().route("/invoke/{command}", post(invoke));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_session_round_trip_over_http() {
    let addr = spawn_backend().await;
    let config = Config::default().with_backend_url(format!("http://{addr}/"));
    let gateway = Arc::new(HttpGateway::new(config.backend_url.clone()));
    let mut coordinator = Coordinator::from_config(&config, gateway);

    coordinator.load_repositories().await;
    coordinator.select_workspace(WORKSPACE).await;
    coordinator.open_file("src/main.rs", "main.rs").await.unwrap();

    let session = coordinator.session();
    assert_eq!(session.registry().workspace_ids_of(REPO), vec![WORKSPACE]);
    assert_eq!(session.tree().file_count(), 1);
    assert_eq!(
        session.current_file().map(|f| f.content.as_str()),
        Some("fn main() {}\n")
    );
    assert_eq!(session.log().count(EntryKind::Error), 0);
}

#[tokio::test]
async fn test_error_bodies_become_remote_messages() {
    let addr = spawn_backend().await;
    let gateway = HttpGateway::new(format!("http://{addr}"));

    let mut args = Args::new();
    args.insert("filePath".into(), json!("nope.txt"));
    assert_eq!(
        gateway.call("read_file_content", args).await,
        Err(BackendError::remote("File not found"))
    );
    assert_eq!(
        gateway.call("clone_repository", Args::new()).await,
        Err(BackendError::remote("Invalid repository URL"))
    );
    assert_eq!(
        gateway.call("not_a_command", Args::new()).await,
        Err(BackendError::remote("unknown command"))
    );
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let addr = spawn_backend().await;
    let gateway = HttpGateway::new(format!("http://{addr}"));
    assert_eq!(
        gateway.call("delete_workspace", Args::new()).await,
        Ok(Value::Null)
    );
}

#[tokio::test]
async fn test_failed_clone_over_http_is_logged_and_returned() {
    let addr = spawn_backend().await;
    let gateway = Arc::new(HttpGateway::new(format!("http://{addr}")));
    let mut coordinator = Coordinator::from_config(&Config::default(), gateway);

    let err = coordinator
        .clone_repository("not a url")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid repository URL");
    assert_eq!(
        coordinator.session().log().last().map(|e| e.text.as_str()),
        Some("Failed to clone repository: Invalid repository URL")
    );
}

#[tokio::test]
async fn test_timeout_gateway_bounds_hung_calls() {
    let addr = spawn_backend().await;
    let gateway = TimeoutGateway::new(
        HttpGateway::new(format!("http://{addr}")),
        Duration::from_millis(100),
    );

    let err = gateway.call("slow", Args::new()).await.unwrap_err();
    assert!(matches!(err, BackendError::Timeout { ref command, .. } if command == "slow"));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = HttpGateway::new(format!("http://{addr}"));
    let err = gateway.call("get_repositories", Args::new()).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}
