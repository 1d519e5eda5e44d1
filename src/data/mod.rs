//! Data model shared between the backend boundary and the session state.

mod models;

pub use models::{
    FileNode, FileTabId, OpenFile, Repository, RepositoryWithWorkspaces, Workspace,
};
