//! Data models for repositories, workspaces, file trees and open files

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Represents a tracked repository that can have multiple workspaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Unique identifier
    pub id: Uuid,
    /// Display name for the repository
    #[serde(default)]
    pub name: Option<String>,
    /// Remote repository URL
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Path to the original checkout
    #[serde(default)]
    pub root_path: Option<String>,
    /// Default branch (usually main)
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Sidebar ordering hint assigned by the backend
    #[serde(default)]
    pub display_order: Option<i64>,
    /// When the repository was added
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Last time the repository was modified
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    /// Name shown in the sidebar
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Unnamed Repository")
    }
}

/// Represents a checked-out working copy within a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier
    pub id: Uuid,
    /// Parent repository ID
    pub repository_id: Uuid,
    /// Git branch this workspace is on
    #[serde(default)]
    pub branch: Option<String>,
    /// Directory name of the working copy
    #[serde(default)]
    pub directory_name: Option<String>,
    /// Backend lifecycle state (e.g. "ready", "initializing")
    #[serde(default)]
    pub state: Option<String>,
    /// Lines added relative to the base branch
    #[serde(default, rename = "git_insertions")]
    pub insertions: Option<i64>,
    /// Lines removed relative to the base branch
    #[serde(default, rename = "git_deletions")]
    pub deletions: Option<i64>,
    /// When the workspace was created
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Last time the workspace was modified
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Label shown in the sidebar: directory name, then branch, then id
    pub fn display_name(&self) -> String {
        self.directory_name
            .as_deref()
            .or(self.branch.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Whether the backend reported any uncommitted line changes
    pub fn has_changes(&self) -> bool {
        self.insertions.unwrap_or(0) > 0 || self.deletions.unwrap_or(0) > 0
    }
}

/// A repository together with its workspaces, as returned by `get_repositories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryWithWorkspaces {
    #[serde(flatten)]
    pub repository: Repository,
    /// Workspaces in display order
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

/// One entry of a workspace's file hierarchy.
///
/// The full path of a node is never stored; it is derived from the names of
/// its ancestors while walking down from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireFileNode", into = "WireFileNode")]
pub enum FileNode {
    File { name: String },
    Directory { name: String, children: Vec<FileNode> },
}

impl FileNode {
    pub fn file(name: impl Into<String>) -> Self {
        FileNode::File { name: name.into() }
    }

    pub fn directory(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        FileNode::Directory {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileNode::File { name } | FileNode::Directory { name, .. } => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileNode::Directory { .. })
    }

    /// Children of a directory; files have none
    pub fn children(&self) -> &[FileNode] {
        match self {
            FileNode::File { .. } => &[],
            FileNode::Directory { children, .. } => children,
        }
    }
}

/// Wire shape of a file node: a flat record with an `is_directory` flag
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFileNode {
    name: String,
    #[serde(default)]
    is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<FileNode>>,
}

impl From<WireFileNode> for FileNode {
    fn from(wire: WireFileNode) -> Self {
        if wire.is_directory {
            FileNode::Directory {
                name: wire.name,
                children: wire.children.unwrap_or_default(),
            }
        } else {
            FileNode::File { name: wire.name }
        }
    }
}

impl From<FileNode> for WireFileNode {
    fn from(node: FileNode) -> Self {
        match node {
            FileNode::File { name } => WireFileNode {
                name,
                is_directory: false,
                children: None,
            },
            FileNode::Directory { name, children } => WireFileNode {
                name,
                is_directory: true,
                children: Some(children),
            },
        }
    }
}

/// Stable tab identity derived from a file path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileTabId(String);

impl FileTabId {
    /// Same path always yields the same id
    pub fn for_path(path: &str) -> Self {
        let digest = Sha256::digest(path.as_bytes());
        let hex: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("file-{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileTabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file whose content has been fetched into a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    pub id: FileTabId,
    pub name: String,
    pub path: String,
    pub content: String,
}

impl OpenFile {
    pub fn new(path: impl Into<String>, name: impl Into<String>, content: String) -> Self {
        let path = path.into();
        Self {
            id: FileTabId::for_path(&path),
            name: name.into(),
            path,
            content,
        }
    }
}

/// Backend timestamps arrive either as RFC 3339 or as SQLite's
/// `YYYY-MM-DD HH:MM:SS` (UTC).
mod timestamp {
    use super::*;

    const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, SQLITE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}
