//! Session state and its reducer
//!
//! [`WorkspaceSession`] owns every piece of browser state. Operations mutate
//! it synchronously and hand back [`Effect`]s for the backend; results come
//! back as [`SessionEvent`]s through [`WorkspaceSession::apply`]. Nothing else
//! writes to the state, so all mutation happens on one logical thread.
//!
//! Selecting a workspace bumps `generation`. Tree fetches and file reads carry
//! the generation they were issued under; a result whose generation is no
//! longer current is dropped without touching state or the log.

use uuid::Uuid;

use crate::config::Config;
use crate::data::{FileTabId, OpenFile};
use crate::ui::action::Action;
use crate::ui::effect::Effect;
use crate::ui::error::SessionError;
use crate::ui::events::SessionEvent;
use crate::ui::file_tree::{FileTreeModel, TreeSelection};
use crate::ui::layout::{LayoutConstraints, Pane};
use crate::ui::repository_registry::RepositoryRegistry;
use crate::ui::tab_manager::{ActiveView, OpenFileRegistry};
use crate::ui::terminal_log::TerminalLog;

/// The workspace browser session
#[derive(Debug)]
pub struct WorkspaceSession {
    registry: RepositoryRegistry,
    tree: FileTreeModel,
    tabs: OpenFileRegistry,
    log: TerminalLog,
    layout: LayoutConstraints,
    selected_workspace: Option<Uuid>,
    /// Bumped on every selection change
    generation: u64,
    /// Generation the current tree was fetched under
    loaded_generation: Option<u64>,
    tree_loading: bool,
    next_clone_ticket: u64,
}

impl Default for WorkspaceSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl WorkspaceSession {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: RepositoryRegistry::new(),
            tree: FileTreeModel::new(),
            tabs: OpenFileRegistry::new(config.max_tabs),
            log: TerminalLog::new(config.terminal_capacity),
            layout: config.layout,
            selected_workspace: None,
            generation: 0,
            loaded_generation: None,
            tree_loading: false,
            next_clone_ticket: 0,
        }
    }

    /// Startup: fetch the repository hierarchy
    pub fn bootstrap(&mut self) -> Vec<Effect> {
        vec![self.load_repositories()]
    }

    // ========== Operations ==========

    pub fn load_repositories(&mut self) -> Effect {
        Effect::LoadRepositories {
            ticket: self.registry.begin_load(),
        }
    }

    /// Make `workspace_id` the selection and fetch its tree.
    ///
    /// The previous tree and all open files are dropped right away, so nothing
    /// from the old workspace stays visible while the fetch is pending.
    pub fn select_workspace(&mut self, workspace_id: Uuid) -> Effect {
        self.generation += 1;
        self.selected_workspace = Some(workspace_id);
        self.tree.clear();
        self.tabs.clear();
        self.loaded_generation = None;
        self.tree_loading = true;
        tracing::debug!(%workspace_id, generation = self.generation, "Selecting workspace");

        Effect::FetchWorkspaceFiles {
            workspace_id,
            generation: self.generation,
        }
    }

    /// Read a file of the selected workspace
    pub fn open_file(
        &mut self,
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Effect, SessionError> {
        let workspace_id = self
            .selected_workspace
            .ok_or(SessionError::NoWorkspaceSelected)?;
        Ok(Effect::ReadFile {
            workspace_id,
            path: path.into(),
            name: name.into(),
            generation: self.generation,
        })
    }

    /// Handle a click on a tree node
    pub fn activate_node(&mut self, path: &str) -> Result<Option<Effect>, SessionError> {
        match self.tree.select(path) {
            Some(TreeSelection::OpenFile { path, name }) => self.open_file(path, name).map(Some),
            Some(TreeSelection::Toggled { .. }) => Ok(None),
            None => {
                tracing::debug!(path, "Activated unknown tree node");
                Ok(None)
            }
        }
    }

    /// Returns the new expand state, or `None` if `path` is not a directory
    pub fn toggle_directory(&mut self, path: &str) -> Option<bool> {
        self.tree.toggle(path)
    }

    pub fn close_current_file(&mut self) {
        self.tabs.close();
    }

    pub fn close_file(&mut self, id: &FileTabId) -> bool {
        self.tabs.close_tab(id)
    }

    pub fn activate_file(&mut self, id: &FileTabId) -> bool {
        self.tabs.activate(id)
    }

    pub fn set_active_view(&mut self, view: ActiveView) {
        self.tabs.set_active_view(view);
    }

    pub fn create_workspace(&mut self, repository_id: Uuid) -> Effect {
        Effect::CreateWorkspace { repository_id }
    }

    pub fn clone_repository(&mut self, url: &str) -> Result<Effect, SessionError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SessionError::validation("Repository URL must not be empty"));
        }
        self.log.info(format!("Cloning repository from {url}..."));
        self.next_clone_ticket += 1;
        Ok(Effect::CloneRepository {
            url: url.to_string(),
            ticket: self.next_clone_ticket,
        })
    }

    pub fn open_project(&mut self, path: &str) -> Result<Effect, SessionError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(SessionError::validation("Project path must not be empty"));
        }
        self.log.info(format!("Opening project at {path}..."));
        Ok(Effect::OpenProject {
            path: path.to_string(),
        })
    }

    pub fn delete_repository(&mut self, id: Uuid) -> Effect {
        Effect::DeleteRepository { id }
    }

    pub fn delete_workspace(&mut self, id: Uuid) -> Effect {
        Effect::DeleteWorkspace { id }
    }

    pub fn resize(&mut self, pane: Pane, delta: i32) -> i32 {
        self.layout.resize(pane, delta)
    }

    pub fn toggle_terminal(&mut self) {
        self.log.toggle_visible();
    }

    /// Run an action, returning the backend calls it needs
    pub fn handle_action(&mut self, action: Action) -> Result<Vec<Effect>, SessionError> {
        let mut effects = Vec::new();
        match action {
            Action::LoadRepositories => effects.push(self.load_repositories()),
            Action::ToggleRepository(id) => {
                self.registry.toggle_collapsed(id);
            }
            Action::CloneRepository(url) => effects.push(self.clone_repository(&url)?),
            Action::OpenProject(path) => effects.push(self.open_project(&path)?),
            Action::DeleteRepository(id) => effects.push(self.delete_repository(id)),
            Action::SelectWorkspace(id) => effects.push(self.select_workspace(id)),
            Action::CreateWorkspace(repository_id) => {
                effects.push(self.create_workspace(repository_id))
            }
            Action::DeleteWorkspace(id) => effects.push(self.delete_workspace(id)),
            Action::OpenFile { path, name } => effects.push(self.open_file(path, name)?),
            Action::ActivateNode(path) => effects.extend(self.activate_node(&path)?),
            Action::ToggleDirectory(path) => {
                self.toggle_directory(&path);
            }
            Action::ExpandAll => self.tree.expand_all(),
            Action::CollapseAll => self.tree.collapse_all(),
            Action::CloseFile => self.close_current_file(),
            Action::CloseTab(id) => {
                self.close_file(&id);
            }
            Action::ActivateTab(id) => {
                self.activate_file(&id);
            }
            Action::NextTab => self.tabs.next_tab(),
            Action::PrevTab => self.tabs.prev_tab(),
            Action::SetActiveView(view) => self.set_active_view(view),
            Action::Resize { pane, delta } => {
                self.resize(pane, delta);
            }
            Action::ToggleTerminal => self.toggle_terminal(),
        }
        Ok(effects)
    }

    // ========== Results ==========

    /// Fold a backend result into the state, returning follow-up effects
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::RepositoriesLoaded { ticket, result } => {
                self.registry.finish_load(ticket, result, &mut self.log);
                Vec::new()
            }

            SessionEvent::WorkspaceFilesLoaded {
                workspace_id,
                generation,
                result,
            } => {
                if !self.is_current(workspace_id, generation) {
                    tracing::debug!(%workspace_id, generation, current = self.generation, "Dropping stale file tree");
                    return Vec::new();
                }
                self.tree_loading = false;
                match result {
                    Ok(roots) => {
                        self.tree.load(workspace_id, roots);
                        self.loaded_generation = Some(generation);
                        self.log.success(format!("Workspace {workspace_id} selected"));
                    }
                    Err(e) => self.log.error(format!("Failed to load workspace files: {e}")),
                }
                Vec::new()
            }

            SessionEvent::FileRead {
                workspace_id,
                path,
                name,
                generation,
                result,
            } => {
                if !self.is_current(workspace_id, generation) {
                    tracing::debug!(%workspace_id, path = %path, "Dropping stale file read");
                    return Vec::new();
                }
                match result {
                    Ok(content) => {
                        self.log.success(format!("Opened file: {name}"));
                        self.tabs.open(OpenFile::new(path, name, content));
                    }
                    Err(e) => self.log.error(format!("Failed to open file: {e}")),
                }
                Vec::new()
            }

            SessionEvent::WorkspaceCreated { result, .. } => match result {
                Ok(workspace) => {
                    tracing::debug!(workspace_id = %workspace.id, "Workspace created");
                    self.log.success("New workspace created");
                    vec![self.load_repositories()]
                }
                Err(e) => {
                    self.log.error(format!("Failed to create workspace: {e}"));
                    Vec::new()
                }
            },

            SessionEvent::RepositoryCloned { result, .. } => match result {
                Ok(()) => {
                    self.log.success("Repository cloned successfully");
                    vec![self.load_repositories()]
                }
                Err(e) => {
                    self.log.error(format!("Failed to clone repository: {e}"));
                    Vec::new()
                }
            },

            SessionEvent::ProjectOpened { result, .. } => match result {
                Ok(()) => {
                    self.log.success("Project opened successfully");
                    vec![self.load_repositories()]
                }
                Err(e) => {
                    self.log.error(format!("Failed to open project: {e}"));
                    Vec::new()
                }
            },

            SessionEvent::RepositoryDeleted { id, result } => match result {
                Ok(()) => {
                    let selected_inside = self
                        .selected_workspace
                        .is_some_and(|ws| self.registry.workspace_ids_of(id).contains(&ws));
                    if selected_inside {
                        self.clear_selection();
                    }
                    self.log.success("Repository deleted");
                    vec![self.load_repositories()]
                }
                Err(e) => {
                    self.log.error(format!("Failed to delete repository: {e}"));
                    Vec::new()
                }
            },

            SessionEvent::WorkspaceDeleted { id, result } => match result {
                Ok(()) => {
                    if self.selected_workspace == Some(id) {
                        self.clear_selection();
                    }
                    self.log.success("Workspace deleted");
                    vec![self.load_repositories()]
                }
                Err(e) => {
                    self.log.error(format!("Failed to delete workspace: {e}"));
                    Vec::new()
                }
            },
        }
    }

    fn is_current(&self, workspace_id: Uuid, generation: u64) -> bool {
        generation == self.generation && self.selected_workspace == Some(workspace_id)
    }

    /// Drop the selection and everything derived from it
    fn clear_selection(&mut self) {
        self.generation += 1;
        self.selected_workspace = None;
        self.tree.clear();
        self.tabs.clear();
        self.loaded_generation = None;
        self.tree_loading = false;
    }

    // ========== Accessors ==========

    pub fn registry(&self) -> &RepositoryRegistry {
        &self.registry
    }

    pub fn tree(&self) -> &FileTreeModel {
        &self.tree
    }

    pub fn tabs(&self) -> &OpenFileRegistry {
        &self.tabs
    }

    pub fn log(&self) -> &TerminalLog {
        &self.log
    }

    pub fn layout(&self) -> &LayoutConstraints {
        &self.layout
    }

    pub fn selected_workspace(&self) -> Option<Uuid> {
        self.selected_workspace
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_generation(&self) -> Option<u64> {
        self.loaded_generation
    }

    pub fn is_tree_loading(&self) -> bool {
        self.tree_loading
    }

    pub fn current_file(&self) -> Option<&OpenFile> {
        self.tabs.current()
    }

    pub fn active_view(&self) -> ActiveView {
        self.tabs.active_view()
    }
}
