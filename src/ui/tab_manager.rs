use crate::data::{FileTabId, OpenFile};

/// Top-level view of the main content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    /// Conversation view, shown when no file is being looked at
    #[default]
    Chat,
    /// Content of the current file tab
    File,
}

/// Manages open files as tabs
#[derive(Debug)]
pub struct OpenFileRegistry {
    /// Open files in tab order
    files: Vec<OpenFile>,
    /// Tab currently shown
    active: Option<FileTabId>,
    /// Current top-level view
    view: ActiveView,
    /// Maximum number of tabs allowed
    max_tabs: usize,
}

impl Default for OpenFileRegistry {
    fn default() -> Self {
        Self::new(10)
    }
}

impl OpenFileRegistry {
    pub fn new(max_tabs: usize) -> Self {
        Self {
            files: Vec::new(),
            active: None,
            view: ActiveView::Chat,
            max_tabs: max_tabs.max(1),
        }
    }

    /// Make `file` the current tab and switch to the file view.
    ///
    /// A path that is already open keeps its tab (content is refreshed). When
    /// the bank is full the oldest tab that is not active is evicted, or the
    /// active tab itself when it is the only one.
    pub fn open(&mut self, file: OpenFile) -> FileTabId {
        let id = file.id.clone();
        if let Some(existing) = self.files.iter_mut().find(|f| f.id == id) {
            *existing = file;
        } else {
            if self.files.len() >= self.max_tabs {
                // Only the active tab is left when max_tabs is 1
                let active = self.active.as_ref();
                let index = self
                    .files
                    .iter()
                    .position(|f| Some(&f.id) != active)
                    .unwrap_or(0);
                let evicted = self.files.remove(index);
                tracing::debug!(path = %evicted.path, "Evicted oldest file tab");
            }
            self.files.push(file);
        }
        self.active = Some(id.clone());
        self.view = ActiveView::File;
        id
    }

    /// Close the current tab
    pub fn close(&mut self) {
        match self.active.clone() {
            Some(id) => {
                self.close_tab(&id);
            }
            None => self.view = ActiveView::Chat,
        }
    }

    /// Close a tab by id.
    ///
    /// Closing the active tab activates the tab that slides into its position
    /// (or the new last tab); closing the last tab returns to the chat view.
    pub fn close_tab(&mut self, id: &FileTabId) -> bool {
        let Some(index) = self.files.iter().position(|f| &f.id == id) else {
            return false;
        };
        self.files.remove(index);

        if self.active.as_ref() == Some(id) {
            if self.files.is_empty() {
                self.active = None;
                self.view = ActiveView::Chat;
            } else {
                let next = index.min(self.files.len() - 1);
                self.active = Some(self.files[next].id.clone());
            }
        }
        true
    }

    /// Drop every tab and return to the chat view
    pub fn clear(&mut self) {
        self.files.clear();
        self.active = None;
        self.view = ActiveView::Chat;
    }

    /// Switch to a specific tab
    pub fn activate(&mut self, id: &FileTabId) -> bool {
        if self.files.iter().any(|f| &f.id == id) {
            self.active = Some(id.clone());
            self.view = ActiveView::File;
            true
        } else {
            false
        }
    }

    /// Switch to the next tab
    pub fn next_tab(&mut self) {
        if let Some(index) = self.active_index() {
            let next = (index + 1) % self.files.len();
            self.active = Some(self.files[next].id.clone());
            self.view = ActiveView::File;
        }
    }

    /// Switch to the previous tab
    pub fn prev_tab(&mut self) {
        if let Some(index) = self.active_index() {
            let prev = if index == 0 {
                self.files.len() - 1
            } else {
                index - 1
            };
            self.active = Some(self.files[prev].id.clone());
            self.view = ActiveView::File;
        }
    }

    pub fn set_active_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    pub fn active_view(&self) -> ActiveView {
        self.view
    }

    /// The file of the active tab
    pub fn current(&self) -> Option<&OpenFile> {
        let id = self.active.as_ref()?;
        self.files.iter().find(|f| &f.id == id)
    }

    pub fn active_id(&self) -> Option<&FileTabId> {
        self.active.as_ref()
    }

    fn active_index(&self) -> Option<usize> {
        let id = self.active.as_ref()?;
        self.files.iter().position(|f| &f.id == id)
    }

    pub fn files(&self) -> &[OpenFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Get tab names for display
    pub fn tab_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }
}
