//! End-to-end session behavior against a scripted backend

use serde_json::json;
use workspace_browser::backend::BackendError;
use workspace_browser::ui::{Action, ActiveView, EntryKind, Pane};
use workspace_browser::{FileNode, SessionError};

use super::common::determinism::IdSequence;
use super::common::fixtures::{
    coordinator, dir_json, file_json, repository_json, wait_for_calls, workspace_json,
};

#[tokio::test]
async fn test_later_selection_wins_when_earlier_fetch_resolves_last() {
    let ids = IdSequence::new();
    let (ws_a, ws_b) = (ids.next(), ids.next());
    let (mock, mut coordinator) = coordinator();

    let release_a = mock.respond_held(
        "get_workspace_files",
        Ok(json!([file_json("from-a.rs")])),
    );
    mock.respond_ok("get_workspace_files", json!([file_json("from-b.rs")]));

    coordinator.dispatch(Action::SelectWorkspace(ws_a)).unwrap();
    wait_for_calls(&mock, "get_workspace_files", 1).await;
    coordinator.dispatch(Action::SelectWorkspace(ws_b)).unwrap();

    // B resolves first
    assert!(coordinator.step().await);
    assert_eq!(coordinator.session().tree().workspace_id(), Some(ws_b));

    // A resolves last and must not overwrite B
    release_a.release();
    coordinator.settle().await;

    let session = coordinator.session();
    assert_eq!(session.selected_workspace(), Some(ws_b));
    assert_eq!(session.tree().roots(), &[FileNode::file("from-b.rs")]);
    assert_eq!(session.loaded_generation(), Some(session.generation()));
    assert_eq!(session.log().count(EntryKind::Success), 1);
    assert!(!session.is_tree_loading());
}

#[tokio::test]
async fn test_file_path_is_built_from_ancestors() {
    let ws = IdSequence::new().next();
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok(
        "get_workspace_files",
        json!([dir_json("src", vec![file_json("a.ts")])]),
    );
    mock.respond_ok("read_file_content", json!("export const a = 1;\n"));

    coordinator.select_workspace(ws).await;
    coordinator.dispatch(Action::ToggleDirectory("src".into())).unwrap();
    coordinator.dispatch(Action::ToggleDirectory("src".into())).unwrap();
    coordinator.dispatch(Action::ActivateNode("src".into())).unwrap();
    coordinator.dispatch(Action::ActivateNode("src/a.ts".into())).unwrap();
    coordinator.settle().await;

    let read = mock
        .calls()
        .into_iter()
        .find(|call| call.command == "read_file_content")
        .expect("file was never read");
    assert_eq!(read.args["filePath"], json!("src/a.ts"));
    assert_eq!(read.args["workspaceId"], json!(ws));

    let file = coordinator.session().current_file().unwrap();
    assert_eq!(file.path, "src/a.ts");
    assert_eq!(file.name, "a.ts");
    assert_eq!(
        coordinator.session().tree().roots(),
        &[FileNode::directory("src", vec![FileNode::file("a.ts")])]
    );
}

#[tokio::test]
async fn test_created_workspace_comes_from_reload() {
    let ids = IdSequence::new();
    let (repo, optimistic, reloaded) = (ids.next(), ids.next(), ids.next());
    let (mock, mut coordinator) = coordinator();

    mock.respond_ok("create_workspace", workspace_json(optimistic, repo, "feature/x"));
    mock.respond_ok(
        "get_repositories",
        json!([repository_json(
            repo,
            "app",
            vec![workspace_json(reloaded, repo, "feature/x")]
        )]),
    );

    coordinator.create_workspace(repo).await;

    let registry = coordinator.session().registry();
    assert!(registry.workspace(reloaded).is_some());
    assert!(registry.workspace(optimistic).is_none());
    assert_eq!(registry.workspace_ids_of(repo), vec![reloaded]);
    assert_eq!(
        coordinator.session().log().lines(),
        vec!["✓ New workspace created", "✓ Repositories loaded successfully"]
    );
}

#[tokio::test]
async fn test_opening_same_path_twice_keeps_one_tab() {
    let ws = IdSequence::new().next();
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok("get_workspace_files", json!([file_json("a.ts")]));
    mock.set_default("read_file_content", Ok(json!("a")));

    coordinator.select_workspace(ws).await;
    coordinator.open_file("src/a.ts", "a.ts").await.unwrap();
    let first = coordinator.session().tabs().active_id().cloned();
    coordinator.open_file("src/a.ts", "a.ts").await.unwrap();

    let tabs = coordinator.session().tabs();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs.active_id().cloned(), first);
    assert_eq!(
        tabs.files().iter().filter(|f| f.path == "src/a.ts").count(),
        1
    );
    assert_eq!(coordinator.session().active_view(), ActiveView::File);
}

#[tokio::test]
async fn test_resize_is_clamped_to_bounds() {
    let (_mock, mut coordinator) = coordinator();

    coordinator
        .dispatch(Action::Resize {
            pane: Pane::Sidebar,
            delta: -88,
        })
        .unwrap();
    assert_eq!(coordinator.session().layout().width(Pane::Sidebar), 200);

    coordinator
        .dispatch(Action::Resize {
            pane: Pane::Sidebar,
            delta: -50,
        })
        .unwrap();
    assert_eq!(coordinator.session().layout().width(Pane::Sidebar), 200);

    coordinator
        .dispatch(Action::Resize {
            pane: Pane::Sidebar,
            delta: 400,
        })
        .unwrap();
    assert_eq!(coordinator.session().layout().width(Pane::Sidebar), 500);
    assert!(coordinator.is_idle());
}

#[tokio::test]
async fn test_deleting_selected_workspace_tears_down_selection() {
    let ids = IdSequence::new();
    let (repo, ws_a, ws_b) = (ids.next(), ids.next(), ids.next());
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok("get_workspace_files", json!([file_json("a.ts")]));
    mock.respond_ok("read_file_content", json!("a"));
    mock.set_default("delete_workspace", Ok(json!(null)));
    mock.set_default(
        "get_repositories",
        Ok(json!([repository_json(repo, "app", vec![])])),
    );

    coordinator.select_workspace(ws_a).await;
    coordinator.open_file("a.ts", "a.ts").await.unwrap();

    // A different workspace leaves everything in place
    coordinator.delete_workspace(ws_b).await;
    assert_eq!(coordinator.session().selected_workspace(), Some(ws_a));
    assert!(coordinator.session().current_file().is_some());
    assert!(!coordinator.session().tree().is_empty());

    coordinator.delete_workspace(ws_a).await;
    let session = coordinator.session();
    assert_eq!(session.selected_workspace(), None);
    assert!(session.current_file().is_none());
    assert!(session.tree().is_empty());
    assert_eq!(mock.call_count("get_repositories"), 2);
}

#[tokio::test]
async fn test_failed_read_keeps_open_file_and_logs_once() {
    let ws = IdSequence::new().next();
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok("get_workspace_files", json!([file_json("a.ts"), file_json("b.bin")]));
    mock.respond_ok("read_file_content", json!("a"));
    mock.respond_err("read_file_content", "stream did not contain valid UTF-8");

    coordinator.select_workspace(ws).await;
    coordinator.open_file("a.ts", "a.ts").await.unwrap();
    let errors_before = coordinator.session().log().count(EntryKind::Error);
    coordinator.open_file("b.bin", "b.bin").await.unwrap();

    let session = coordinator.session();
    assert_eq!(session.current_file().map(|f| f.path.as_str()), Some("a.ts"));
    assert_eq!(session.current_file().map(|f| f.content.as_str()), Some("a"));
    assert_eq!(session.log().count(EntryKind::Error), errors_before + 1);
    assert_eq!(
        session.log().last().map(|e| e.text.as_str()),
        Some("Failed to open file: stream did not contain valid UTF-8")
    );
}

#[tokio::test]
async fn test_read_for_previous_workspace_is_discarded() {
    let ids = IdSequence::new();
    let (ws_a, ws_b) = (ids.next(), ids.next());
    let (mock, mut coordinator) = coordinator();
    mock.set_default("get_workspace_files", Ok(json!([file_json("a.ts")])));
    let release = mock.respond_held("read_file_content", Ok(json!("from a")));

    coordinator.select_workspace(ws_a).await;
    coordinator
        .dispatch(Action::OpenFile {
            path: "a.ts".into(),
            name: "a.ts".into(),
        })
        .unwrap();
    wait_for_calls(&mock, "read_file_content", 1).await;

    coordinator.dispatch(Action::SelectWorkspace(ws_b)).unwrap();
    release.release();
    coordinator.settle().await;

    assert_eq!(coordinator.session().selected_workspace(), Some(ws_b));
    assert!(coordinator.session().current_file().is_none());
    assert!(!coordinator
        .session()
        .log()
        .entries()
        .any(|e| e.text.starts_with("Opened file")));
}

#[tokio::test]
async fn test_open_file_requires_selection() {
    let (mock, mut coordinator) = coordinator();
    let err = coordinator.open_file("a.ts", "a.ts").await.unwrap_err();
    assert_eq!(err, SessionError::NoWorkspaceSelected);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_clone_success_reloads_hierarchy() {
    let repo = IdSequence::new().next();
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok("clone_repository", json!(null));
    mock.respond_ok(
        "get_repositories",
        json!([repository_json(repo, "cloned", vec![])]),
    );

    coordinator
        .clone_repository("https://example.com/cloned.git")
        .await
        .unwrap();

    assert!(coordinator.session().registry().repository(repo).is_some());
    assert_eq!(
        coordinator.session().log().lines(),
        vec![
            "• Cloning repository from https://example.com/cloned.git...",
            "✓ Repository cloned successfully",
            "✓ Repositories loaded successfully",
        ]
    );
}

#[tokio::test]
async fn test_open_project_failure_is_logged_not_returned() {
    let (mock, mut coordinator) = coordinator();
    mock.respond_err("open_project", "not a git repository");

    coordinator.open_project("/tmp/plain-dir").await.unwrap();

    assert_eq!(
        coordinator.session().log().lines(),
        vec![
            "• Opening project at /tmp/plain-dir...",
            "✗ Failed to open project: not a git repository",
        ]
    );
    assert_eq!(mock.call_count("get_repositories"), 0);
}

#[tokio::test]
async fn test_deleting_repository_of_selection_clears_it() {
    let ids = IdSequence::new();
    let (repo, ws) = (ids.next(), ids.next());
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok(
        "get_repositories",
        json!([repository_json(repo, "app", vec![workspace_json(ws, repo, "main")])]),
    );
    mock.respond_ok("get_workspace_files", json!([]));
    mock.respond_ok("delete_repo", json!(null));
    mock.respond_ok("get_repositories", json!([]));

    coordinator.load_repositories().await;
    coordinator.select_workspace(ws).await;
    coordinator.delete_repository(repo).await;

    let session = coordinator.session();
    assert_eq!(session.selected_workspace(), None);
    assert!(session.registry().is_empty());
    assert_eq!(session.log().last().map(|e| e.text.as_str()), Some("Repositories loaded successfully"));
}

#[tokio::test]
async fn test_load_failure_keeps_cached_hierarchy() {
    let repo = IdSequence::new().next();
    let (mock, mut coordinator) = coordinator();
    mock.respond_ok("get_repositories", json!([repository_json(repo, "app", vec![])]));
    mock.respond_err("get_repositories", "database is locked");

    coordinator.load_repositories().await;
    coordinator.load_repositories().await;

    let session = coordinator.session();
    assert!(session.registry().repository(repo).is_some());
    assert!(!session.registry().is_loading());
    assert_eq!(
        session.log().last().map(|e| e.text.as_str()),
        Some("Failed to load repositories: database is locked")
    );
}

#[tokio::test]
async fn test_backend_error_message_reaches_caller_verbatim() {
    let (mock, mut coordinator) = coordinator();
    mock.respond_err("clone_repository", "repository not found");

    let err = coordinator
        .clone_repository("https://example.com/missing.git")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::Backend(BackendError::remote("repository not found"))
    );
    assert_eq!(err.to_string(), "repository not found");
}
