//! Task Board
//!
//! Client core of a multi-tenant kanban board:
//! - ordering / reconcile: ranked collections and drag-and-drop reorders
//! - cache: optimistic mirror of the records a session has loaded
//! - store: the session's state object and its actions
//! - dnd: drag layer targets to reorder requests
//! - toast / session / analytics / config: the surrounding app state
//!
//! Records persist through `board_store` (SQLite or in-memory).

pub mod analytics;
pub mod backend;
pub mod cache;
pub mod config;
pub mod dnd;
pub mod error;
pub mod ordering;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod toast;

pub use backend::Backend;
pub use cache::BoardCache;
pub use config::{load_config, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use ordering::{ContainerId, ItemId, Ordered};
pub use reconcile::{reorder, Placement, ReorderRequest};
pub use session::{AccessLevel, Role, Session, ViewMode};
pub use store::{BoardScope, BoardStore, CardEdit, CommitReport, PendingReorder};
pub use toast::{Notifier, Severity, Toast, ToastManager};

pub use board_store;
pub use leptos_dragdrop::{DragItem, DragKind, DropTarget};
