//! File tree model for the explorer pane
//!
//! The tree data is immutable per fetch; expand/collapse lives in a side set
//! keyed by full path, so toggling never touches the nodes themselves.

use std::collections::HashSet;

use uuid::Uuid;

use crate::data::FileNode;

/// Kind of a visible row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    File,
    Directory { expanded: bool },
}

/// A visible node in the flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    /// Full path from the workspace root
    pub path: String,
    pub name: &'a str,
    /// Depth in the tree (0 for root entries)
    pub depth: usize,
    pub kind: RowKind,
}

/// What selecting a node did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSelection {
    /// A file was picked; the caller should open it
    OpenFile { path: String, name: String },
    /// A directory was toggled
    Toggled { path: String, expanded: bool },
}

/// Join a parent path and a child name
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// One workspace's file hierarchy plus its expand state
#[derive(Debug, Default)]
pub struct FileTreeModel {
    workspace_id: Option<Uuid>,
    roots: Vec<FileNode>,
    expanded: HashSet<String>,
}

impl FileTreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tree with a freshly fetched one; expand state starts over
    pub fn load(&mut self, workspace_id: Uuid, roots: Vec<FileNode>) {
        self.workspace_id = Some(workspace_id);
        self.roots = roots;
        self.expanded.clear();
    }

    pub fn clear(&mut self) {
        self.workspace_id = None;
        self.roots.clear();
        self.expanded.clear();
    }

    /// Workspace the loaded tree belongs to
    pub fn workspace_id(&self) -> Option<Uuid> {
        self.workspace_id
    }

    pub fn roots(&self) -> &[FileNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Get all visible rows as a flat list
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        self.collect_rows(&self.roots, "", 0, &mut rows);
        rows
    }

    fn collect_rows<'a>(
        &self,
        nodes: &'a [FileNode],
        parent_path: &str,
        depth: usize,
        out: &mut Vec<TreeRow<'a>>,
    ) {
        for node in nodes {
            let path = join_path(parent_path, node.name());
            match node {
                FileNode::File { name } => out.push(TreeRow {
                    path,
                    name,
                    depth,
                    kind: RowKind::File,
                }),
                FileNode::Directory { name, children } => {
                    let expanded = self.expanded.contains(&path);
                    out.push(TreeRow {
                        path: path.clone(),
                        name,
                        depth,
                        kind: RowKind::Directory { expanded },
                    });
                    if expanded {
                        self.collect_rows(children, &path, depth + 1, out);
                    }
                }
            }
        }
    }

    /// Get the visible row at a given index
    pub fn row_at(&self, index: usize) -> Option<TreeRow<'_>> {
        self.rows().into_iter().nth(index)
    }

    /// Resolve a full path to its node
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        let mut level = self.roots.as_slice();
        let mut found = None;
        for segment in path.split('/') {
            let node = level.iter().find(|n| n.name() == segment)?;
            level = node.children();
            found = Some(node);
        }
        found
    }

    /// Toggle a directory; returns the new state, or `None` if `path` is not a directory
    pub fn toggle(&mut self, path: &str) -> Option<bool> {
        if !self.find(path)?.is_directory() {
            return None;
        }
        if self.expanded.remove(path) {
            Some(false)
        } else {
            self.expanded.insert(path.to_string());
            Some(true)
        }
    }

    /// Select a node: files are handed back for opening, directories toggle
    pub fn select(&mut self, path: &str) -> Option<TreeSelection> {
        if let FileNode::File { name } = self.find(path)? {
            return Some(TreeSelection::OpenFile {
                path: path.to_string(),
                name: name.clone(),
            });
        }
        let expanded = self.toggle(path)?;
        Some(TreeSelection::Toggled {
            path: path.to_string(),
            expanded,
        })
    }

    /// Select the visible row at a given index
    pub fn select_at(&mut self, index: usize) -> Option<TreeSelection> {
        let path = self.row_at(index)?.path;
        self.select(&path)
    }

    pub fn expand_all(&mut self) {
        let mut paths = Vec::new();
        collect_directory_paths(&self.roots, "", &mut paths);
        self.expanded.extend(paths);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Number of files (not directories) in the whole tree
    pub fn file_count(&self) -> usize {
        fn count(nodes: &[FileNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    FileNode::File { .. } => 1,
                    FileNode::Directory { children, .. } => count(children),
                })
                .sum()
        }
        count(&self.roots)
    }
}

fn collect_directory_paths(nodes: &[FileNode], parent_path: &str, out: &mut Vec<String>) {
    for node in nodes {
        if let FileNode::Directory { name, children } = node {
            let path = join_path(parent_path, name);
            collect_directory_paths(children, &path, out);
            out.push(path);
        }
    }
}
