//! User intents the session reacts to
//!
//! Each action is a single, atomic operation. Actions that need the backend
//! produce effects; the rest only touch local state.

use uuid::Uuid;

use crate::data::FileTabId;
use crate::ui::layout::Pane;
use crate::ui::tab_manager::ActiveView;

/// All session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ========== Repositories ==========
    /// Reload the repository hierarchy
    LoadRepositories,
    /// Collapse or expand a repository in the sidebar
    ToggleRepository(Uuid),
    /// Clone a repository from a URL
    CloneRepository(String),
    /// Register a local directory as a repository
    OpenProject(String),
    DeleteRepository(Uuid),

    // ========== Workspaces ==========
    SelectWorkspace(Uuid),
    CreateWorkspace(Uuid),
    DeleteWorkspace(Uuid),

    // ========== File Explorer ==========
    /// Open a file of the selected workspace
    OpenFile { path: String, name: String },
    /// Click on a tree node: files open, directories toggle
    ActivateNode(String),
    ToggleDirectory(String),
    ExpandAll,
    CollapseAll,

    // ========== Tabs ==========
    /// Close the current file tab
    CloseFile,
    CloseTab(FileTabId),
    ActivateTab(FileTabId),
    NextTab,
    PrevTab,
    SetActiveView(ActiveView),

    // ========== Layout ==========
    Resize { pane: Pane, delta: i32 },
    ToggleTerminal,
}

