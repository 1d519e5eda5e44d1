//! Cached repository → workspace hierarchy

use std::collections::HashSet;

use uuid::Uuid;

use crate::backend::BackendError;
use crate::data::{Repository, RepositoryWithWorkspaces, Workspace};
use crate::ui::terminal_log::TerminalLog;

/// How a finished load was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The hierarchy was replaced
    Applied,
    /// The backend failed; the previous hierarchy is kept
    Failed,
    /// A newer load already landed; this result was dropped
    Superseded,
}

/// Holds the last successfully loaded hierarchy.
///
/// The hierarchy is only ever replaced as a whole, so readers never see a
/// partially updated list. Loads are ticketed: a response older than one
/// already applied is dropped.
#[derive(Debug, Default)]
pub struct RepositoryRegistry {
    repositories: Vec<RepositoryWithWorkspaces>,
    /// Repositories collapsed in the sidebar (expanded is the default)
    collapsed: HashSet<Uuid>,
    next_ticket: u64,
    applied_ticket: u64,
    loads_in_flight: usize,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a load as started and return its ticket
    pub fn begin_load(&mut self) -> u64 {
        self.next_ticket += 1;
        self.loads_in_flight += 1;
        self.next_ticket
    }

    /// Apply the result of the load identified by `ticket`
    pub fn finish_load(
        &mut self,
        ticket: u64,
        result: Result<Vec<RepositoryWithWorkspaces>, BackendError>,
        log: &mut TerminalLog,
    ) -> LoadOutcome {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);

        if ticket < self.applied_ticket {
            tracing::debug!(ticket, applied = self.applied_ticket, "Dropping superseded repository load");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(repositories) => {
                self.applied_ticket = ticket;
                self.collapsed
                    .retain(|id| repositories.iter().any(|r| r.repository.id == *id));
                tracing::debug!(count = repositories.len(), "Repositories loaded");
                self.repositories = repositories;
                log.success("Repositories loaded successfully");
                LoadOutcome::Applied
            }
            Err(e) => {
                log.error(format!("Failed to load repositories: {e}"));
                LoadOutcome::Failed
            }
        }
    }

    /// Whether any load is still waiting for the backend
    pub fn is_loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    pub fn repositories(&self) -> &[RepositoryWithWorkspaces] {
        &self.repositories
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn repository(&self, id: Uuid) -> Option<&Repository> {
        self.repositories
            .iter()
            .map(|r| &r.repository)
            .find(|r| r.id == id)
    }

    pub fn workspace(&self, id: Uuid) -> Option<&Workspace> {
        self.workspaces().find(|w| w.id == id)
    }

    /// All workspaces in display order
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.repositories.iter().flat_map(|r| r.workspaces.iter())
    }

    /// Repository that holds the given workspace
    pub fn repository_of(&self, workspace_id: Uuid) -> Option<&Repository> {
        self.repositories
            .iter()
            .find(|r| r.workspaces.iter().any(|w| w.id == workspace_id))
            .map(|r| &r.repository)
    }

    pub fn workspace_ids_of(&self, repository_id: Uuid) -> Vec<Uuid> {
        self.repositories
            .iter()
            .find(|r| r.repository.id == repository_id)
            .map(|r| r.workspaces.iter().map(|w| w.id).collect())
            .unwrap_or_default()
    }

    /// Toggle a repository's expand state in the sidebar
    pub fn toggle_collapsed(&mut self, repository_id: Uuid) -> bool {
        if !self.collapsed.remove(&repository_id) {
            self.collapsed.insert(repository_id);
        }
        self.is_collapsed(repository_id)
    }

    pub fn is_collapsed(&self, repository_id: Uuid) -> bool {
        self.collapsed.contains(&repository_id)
    }
}
