pub mod backend;
pub mod config;
pub mod data;
pub mod ui;
pub mod util;

pub use backend::{Backend, BackendError, BackendGateway, HttpGateway, MockGateway, TimeoutGateway};
pub use config::Config;
pub use data::{FileNode, FileTabId, OpenFile, Repository, RepositoryWithWorkspaces, Workspace};
pub use ui::{Action, Coordinator, SessionError, SessionEvent, WorkspaceSession};
