//! Todo/notification content feeding the bubble.
//!
//! The content itself is owned by external writers (the user's editor, the
//! mail fetcher). This module only reads it, groups it into rows, and reports
//! when it changes.
//!
//! # Modules
//!
//! - `rows`: Grouping raw text into email and task rows
//! - `source`: File reads with placeholder fallback
//! - `watcher`: Filesystem change notifications

pub mod rows;
pub mod source;
pub mod watcher;

pub use rows::{parse_rows, NotificationRow, RowKind};
pub use source::{ContentSnapshot, ContentSource, PLACEHOLDER};
pub use watcher::ContentWatcher;
