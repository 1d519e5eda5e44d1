//! Backend payload builders and mock helpers

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use uuid::Uuid;
use workspace_browser::{Config, Coordinator, MockGateway};

use super::determinism::TEST_TIMESTAMP;

/// A `get_repositories` entry
pub fn repository_json(id: Uuid, name: &str, workspaces: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": name,
        "remote_url": format!("https://example.com/{name}.git"),
        "default_branch": "main",
        "created_at": TEST_TIMESTAMP,
        "updated_at": TEST_TIMESTAMP,
        "workspaces": workspaces,
    })
}

/// A workspace record as nested in a repository or returned by `create_workspace`
pub fn workspace_json(id: Uuid, repository_id: Uuid, branch: &str) -> Value {
    json!({
        "id": id,
        "repository_id": repository_id,
        "branch": branch,
        "directory_name": branch.replace('/', "-"),
        "state": "ready",
        "git_insertions": 0,
        "git_deletions": 0,
        "created_at": TEST_TIMESTAMP,
        "updated_at": TEST_TIMESTAMP,
    })
}

pub fn file_json(name: &str) -> Value {
    json!({ "name": name, "is_directory": false })
}

pub fn dir_json(name: &str, children: Vec<Value>) -> Value {
    json!({ "name": name, "is_directory": true, "children": children })
}

/// Coordinator over a fresh mock with default configuration
pub fn coordinator() -> (Arc<MockGateway>, Coordinator) {
    let mock = Arc::new(MockGateway::new());
    let coordinator = Coordinator::from_config(&Config::default(), mock.clone());
    (mock, coordinator)
}

/// Yield until the mock has seen `count` calls to `command`
pub async fn wait_for_calls(mock: &MockGateway, command: &str, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while mock.call_count(command) < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("backend call was never issued");
}
