use uuid::Uuid;

use crate::backend::BackendError;
use crate::data::{FileNode, RepositoryWithWorkspaces, Workspace};

/// Backend results delivered back to the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Repository hierarchy fetched
    RepositoriesLoaded {
        ticket: u64,
        result: Result<Vec<RepositoryWithWorkspaces>, BackendError>,
    },

    /// File tree of a workspace fetched
    WorkspaceFilesLoaded {
        workspace_id: Uuid,
        generation: u64,
        result: Result<Vec<FileNode>, BackendError>,
    },

    /// File content fetched
    FileRead {
        workspace_id: Uuid,
        path: String,
        name: String,
        generation: u64,
        result: Result<String, BackendError>,
    },

    WorkspaceCreated {
        repository_id: Uuid,
        result: Result<Workspace, BackendError>,
    },

    RepositoryCloned {
        url: String,
        ticket: u64,
        result: Result<(), BackendError>,
    },

    ProjectOpened {
        path: String,
        result: Result<(), BackendError>,
    },

    RepositoryDeleted {
        id: Uuid,
        result: Result<(), BackendError>,
    },

    WorkspaceDeleted {
        id: Uuid,
        result: Result<(), BackendError>,
    },
}

