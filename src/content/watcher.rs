//! Change notifications for the todo file.
//!
//! Watches the directory containing the todo file (editors and the mail fetcher
//! both replace the file atomically, which a watch on the file itself would
//! miss) and invokes a callback whenever an event touches the file name.

use crate::domain::error::{PetError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Keeps a filesystem watch alive for as long as it is held.
pub struct ContentWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl std::fmt::Debug for ContentWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ContentWatcher {
    /// Starts watching `path`, calling `on_change` from the watcher's thread.
    ///
    /// The file itself does not need to exist yet, only its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or parent directory, or
    /// if the platform watcher cannot be created.
    pub fn new<F>(path: &Path, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| PetError::Content(format!("no file name in {}", path.display())))?
            .to_os_string();

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let handler = move |result: std::result::Result<Event, notify::Error>| match result {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                let touches_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().is_some_and(|name| name == file_name));
                if touches_file {
                    tracing::debug!(kind = ?event.kind, "todo file changed");
                    on_change();
                }
            }
            Err(e) => tracing::warn!(error = %e, "todo watcher error"),
        };

        let mut watcher = notify::recommended_watcher(handler)
            .map_err(|e| PetError::Content(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| PetError::Content(format!("failed to watch {}: {e}", parent.display())))?;

        tracing::info!(path = %path.display(), "watching todo file");

        Ok(Self {
            _watcher: watcher,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn watch(path: &Path) -> (ContentWatcher, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel();
        let watcher = ContentWatcher::new(path, move || {
            let _ = tx.send(());
        })
        .unwrap();
        (watcher, rx)
    }

    #[test]
    fn direct_write_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        let (_watcher, changes) = watch(&path);

        fs::write(&path, "buy milk\n").unwrap();

        assert!(changes.recv_timeout(WAIT).is_ok());
    }

    #[test]
    fn atomic_replace_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "old\n").unwrap();
        let (_watcher, changes) = watch(&path);

        let staged = dir.path().join("todo.txt.tmp");
        fs::write(&staged, "new\n").unwrap();
        fs::rename(&staged, &path).unwrap();

        assert!(changes.recv_timeout(WAIT).is_ok());
    }

    #[test]
    fn other_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (_watcher, changes) = watch(&dir.path().join("todo.txt"));

        fs::write(dir.path().join("notes.txt"), "unrelated\n").unwrap();

        assert!(changes.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        assert!(ContentWatcher::new(Path::new("/"), || {}).is_err());
    }
}
