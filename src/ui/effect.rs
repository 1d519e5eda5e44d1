use uuid::Uuid;

use crate::backend::{Backend, BackendCommand};
use crate::ui::events::SessionEvent;

/// Backend calls that should be executed outside the reducer.
///
/// Each variant carries whatever its result needs to be matched back to the
/// session state that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadRepositories {
        ticket: u64,
    },
    FetchWorkspaceFiles {
        workspace_id: Uuid,
        /// Selection generation at the time of the request
        generation: u64,
    },
    ReadFile {
        workspace_id: Uuid,
        path: String,
        name: String,
        generation: u64,
    },
    CreateWorkspace {
        repository_id: Uuid,
    },
    CloneRepository {
        url: String,
        /// Correlates the result with the caller waiting on it
        ticket: u64,
    },
    OpenProject {
        path: String,
    },
    DeleteRepository {
        id: Uuid,
    },
    DeleteWorkspace {
        id: Uuid,
    },
}

impl Effect {
    /// The backend command this effect issues
    pub fn command(&self) -> BackendCommand {
        match self {
            Effect::LoadRepositories { .. } => BackendCommand::GetRepositories,
            Effect::FetchWorkspaceFiles { workspace_id, .. } => BackendCommand::GetWorkspaceFiles {
                workspace_id: *workspace_id,
            },
            Effect::ReadFile {
                workspace_id, path, ..
            } => BackendCommand::ReadFileContent {
                workspace_id: *workspace_id,
                file_path: path.clone(),
            },
            Effect::CreateWorkspace { repository_id } => BackendCommand::CreateWorkspace {
                repository_id: *repository_id,
            },
            Effect::CloneRepository { url, .. } => BackendCommand::CloneRepository { url: url.clone() },
            Effect::OpenProject { path } => BackendCommand::OpenProject { path: path.clone() },
            Effect::DeleteRepository { id } => BackendCommand::DeleteRepository { id: *id },
            Effect::DeleteWorkspace { id } => BackendCommand::DeleteWorkspace { id: *id },
        }
    }

    /// Execute the effect against the backend and package its result
    pub async fn run(self, backend: &Backend) -> SessionEvent {
        match self {
            Effect::LoadRepositories { ticket } => SessionEvent::RepositoriesLoaded {
                ticket,
                result: backend.get_repositories().await,
            },
            Effect::FetchWorkspaceFiles {
                workspace_id,
                generation,
            } => SessionEvent::WorkspaceFilesLoaded {
                workspace_id,
                generation,
                result: backend.get_workspace_files(workspace_id).await,
            },
            Effect::ReadFile {
                workspace_id,
                path,
                name,
                generation,
            } => {
                let result = backend.read_file_content(workspace_id, &path).await;
                SessionEvent::FileRead {
                    workspace_id,
                    path,
                    name,
                    generation,
                    result,
                }
            }
            Effect::CreateWorkspace { repository_id } => SessionEvent::WorkspaceCreated {
                repository_id,
                result: backend.create_workspace(repository_id).await,
            },
            Effect::CloneRepository { url, ticket } => {
                let result = backend.clone_repository(&url).await;
                SessionEvent::RepositoryCloned { url, ticket, result }
            }
            Effect::OpenProject { path } => {
                let result = backend.open_project(&path).await;
                SessionEvent::ProjectOpened { path, result }
            }
            Effect::DeleteRepository { id } => SessionEvent::RepositoryDeleted {
                id,
                result: backend.delete_repository(id).await,
            },
            Effect::DeleteWorkspace { id } => SessionEvent::WorkspaceDeleted {
                id,
                result: backend.delete_workspace(id).await,
            },
        }
    }
}
