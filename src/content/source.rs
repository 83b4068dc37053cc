//! File-backed todo/notification content source.
//!
//! Reads the todo file that the mail fetcher and the user both write to. A
//! missing or unreadable file is never fatal: the source substitutes a fixed
//! placeholder so the bubble always has something to show.

use crate::content::rows::{parse_rows, NotificationRow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text shown when the backing file cannot be read.
pub const PLACEHOLDER: &str = "No todo.txt found!";

/// A snapshot of the content source at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    /// Rows grouped from the raw text.
    pub rows: Vec<NotificationRow>,

    /// Unix timestamp of the read.
    pub read_at: i64,

    /// Whether the placeholder was substituted for unreadable content.
    pub placeholder: bool,
}

/// Reads and caches the todo file.
#[derive(Debug)]
pub struct ContentSource {
    /// Path to the todo file.
    path: PathBuf,

    /// Raw text of the last read, used to suppress redundant pushes.
    last_text: Option<String>,
}

impl ContentSource {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_text: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, falling back to [`PLACEHOLDER`] on any error.
    ///
    /// Always returns a snapshot, even if the text is unchanged.
    pub fn read(&mut self) -> ContentSnapshot {
        let (text, placeholder) = match std::fs::read_to_string(&self.path) {
            Ok(text) => (text.trim().to_string(), false),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "content source unavailable, using placeholder");
                (PLACEHOLDER.to_string(), true)
            }
        };

        let rows = parse_rows(&text);
        tracing::debug!(row_count = rows.len(), placeholder, "content read");
        self.last_text = Some(text);

        ContentSnapshot {
            rows,
            read_at: chrono::Utc::now().timestamp(),
            placeholder,
        }
    }

    /// Re-reads the file and returns a snapshot only if the text changed since
    /// the previous read.
    pub fn refresh(&mut self) -> Option<ContentSnapshot> {
        let previous = self.last_text.take();
        let snapshot = self.read();
        if previous.as_ref() == self.last_text.as_ref() {
            tracing::trace!("content unchanged");
            None
        } else {
            Some(snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::rows::RowKind;
    use std::io::Write;

    #[test]
    fn missing_file_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ContentSource::new(dir.path().join("todo.txt"));

        let snapshot = source.read();

        assert!(snapshot.placeholder);
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].text, PLACEHOLDER);
    }

    #[test]
    fn reads_and_groups_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "📧 carol: standup moved").unwrap();
        writeln!(file, "ship release").unwrap();

        let mut source = ContentSource::new(file.path().to_path_buf());
        let snapshot = source.read();

        assert!(!snapshot.placeholder);
        assert_eq!(snapshot.rows[0].kind, RowKind::Email);
        assert_eq!(snapshot.rows[1].kind, RowKind::Task);
    }

    #[test]
    fn refresh_only_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, "one").unwrap();

        let mut source = ContentSource::new(path.clone());
        assert!(source.refresh().is_some());
        assert!(source.refresh().is_none());

        std::fs::write(&path, "one\ntwo").unwrap();
        let changed = source.refresh().unwrap();
        assert_eq!(changed.rows.len(), 2);
    }
}
