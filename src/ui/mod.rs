pub mod action;
pub mod coordinator;
pub mod effect;
mod error;
pub mod events;
pub mod file_tree;
pub mod layout;
pub mod repository_registry;
pub mod session;
pub mod tab_manager;
pub mod terminal_log;

pub use action::Action;
pub use coordinator::Coordinator;
pub use effect::Effect;
pub use error::SessionError;
pub use events::SessionEvent;
pub use file_tree::{FileTreeModel, RowKind, TreeRow, TreeSelection};
pub use layout::{LayoutConstraints, Pane, PaneWidth};
pub use repository_registry::{LoadOutcome, RepositoryRegistry};
pub use session::WorkspaceSession;
pub use tab_manager::{ActiveView, OpenFileRegistry};
pub use terminal_log::{EntryKind, TerminalEntry, TerminalLog};
