//! Request/response boundary to the external backend service.
//!
//! Everything the session knows about repositories, workspaces and files comes
//! through [`BackendGateway::call`]. Gateways hold no session state and never
//! retry; a call either fully succeeded or is treated as not having happened.

mod error;
pub mod http;
pub mod mock;
mod timeout;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::data::{FileNode, RepositoryWithWorkspaces, Workspace};

pub use error::BackendError;
pub use http::HttpGateway;
pub use mock::MockGateway;
pub use timeout::TimeoutGateway;

/// Named arguments of a backend command
pub type Args = Map<String, Value>;

/// A single asynchronous command channel to the backend
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn call(&self, command: &str, args: Args) -> Result<Value, BackendError>;
}

#[async_trait]
impl<G: BackendGateway + ?Sized> BackendGateway for Arc<G> {
    async fn call(&self, command: &str, args: Args) -> Result<Value, BackendError> {
        (**self).call(command, args).await
    }
}

/// The commands the session issues, with their wire names and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    GetRepositories,
    GetWorkspaceFiles { workspace_id: Uuid },
    ReadFileContent { workspace_id: Uuid, file_path: String },
    CreateWorkspace { repository_id: Uuid },
    CloneRepository { url: String },
    OpenProject { path: String },
    DeleteRepository { id: Uuid },
    DeleteWorkspace { id: Uuid },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::GetRepositories => "get_repositories",
            BackendCommand::GetWorkspaceFiles { .. } => "get_workspace_files",
            BackendCommand::ReadFileContent { .. } => "read_file_content",
            BackendCommand::CreateWorkspace { .. } => "create_workspace",
            BackendCommand::CloneRepository { .. } => "clone_repository",
            BackendCommand::OpenProject { .. } => "open_project",
            BackendCommand::DeleteRepository { .. } => "delete_repo",
            BackendCommand::DeleteWorkspace { .. } => "delete_workspace",
        }
    }

    pub fn args(&self) -> Args {
        let value = match self {
            BackendCommand::GetRepositories => json!({}),
            BackendCommand::GetWorkspaceFiles { workspace_id } => {
                json!({ "workspaceId": workspace_id })
            }
            BackendCommand::ReadFileContent {
                workspace_id,
                file_path,
            } => json!({ "workspaceId": workspace_id, "filePath": file_path }),
            BackendCommand::CreateWorkspace { repository_id } => {
                json!({ "repositoryId": repository_id })
            }
            BackendCommand::CloneRepository { url } => json!({ "url": url }),
            BackendCommand::OpenProject { path } => json!({ "path": path }),
            BackendCommand::DeleteRepository { id } | BackendCommand::DeleteWorkspace { id } => {
                json!({ "id": id })
            }
        };
        match value {
            Value::Object(map) => map,
            _ => Args::new(),
        }
    }
}

/// Typed client over a gateway
#[derive(Clone)]
pub struct Backend {
    gateway: Arc<dyn BackendGateway>,
}

impl Backend {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Issue a command and return the raw result
    pub async fn send(&self, command: &BackendCommand) -> Result<Value, BackendError> {
        let name = command.name();
        tracing::debug!(command = name, "Calling backend");
        let result = self.gateway.call(name, command.args()).await;
        if let Err(e) = &result {
            tracing::debug!(command = name, error = %e, "Backend call failed");
        }
        result
    }

    async fn send_decoded<T: DeserializeOwned>(
        &self,
        command: BackendCommand,
    ) -> Result<T, BackendError> {
        let value = self.send(&command).await?;
        serde_json::from_value(value).map_err(|e| BackendError::decode(command.name(), e))
    }

    async fn send_unit(&self, command: BackendCommand) -> Result<(), BackendError> {
        self.send(&command).await.map(|_| ())
    }

    pub async fn get_repositories(&self) -> Result<Vec<RepositoryWithWorkspaces>, BackendError> {
        self.send_decoded(BackendCommand::GetRepositories).await
    }

    pub async fn get_workspace_files(
        &self,
        workspace_id: Uuid,
    ) -> Result<Vec<FileNode>, BackendError> {
        self.send_decoded(BackendCommand::GetWorkspaceFiles { workspace_id })
            .await
    }

    pub async fn read_file_content(
        &self,
        workspace_id: Uuid,
        file_path: &str,
    ) -> Result<String, BackendError> {
        self.send_decoded(BackendCommand::ReadFileContent {
            workspace_id,
            file_path: file_path.to_string(),
        })
        .await
    }

    pub async fn create_workspace(&self, repository_id: Uuid) -> Result<Workspace, BackendError> {
        self.send_decoded(BackendCommand::CreateWorkspace { repository_id })
            .await
    }

    pub async fn clone_repository(&self, url: &str) -> Result<(), BackendError> {
        self.send_unit(BackendCommand::CloneRepository {
            url: url.to_string(),
        })
        .await
    }

    pub async fn open_project(&self, path: &str) -> Result<(), BackendError> {
        self.send_unit(BackendCommand::OpenProject {
            path: path.to_string(),
        })
        .await
    }

    pub async fn delete_repository(&self, id: Uuid) -> Result<(), BackendError> {
        self.send_unit(BackendCommand::DeleteRepository { id }).await
    }

    pub async fn delete_workspace(&self, id: Uuid) -> Result<(), BackendError> {
        self.send_unit(BackendCommand::DeleteWorkspace { id }).await
    }
}
