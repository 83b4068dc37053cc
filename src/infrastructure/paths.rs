//! Path utilities for data files and user-supplied paths.

use std::path::PathBuf;

/// Returns the data directory for traces and the default todo file.
///
/// Resolves to `ping-pet` under the platform's local data directory
/// (`~/.local/share` on Linux, `%LOCALAPPDATA%` on Windows,
/// `~/Library/Application Support` on macOS). Falls back to a relative
/// `ping-pet` directory when the platform reports none.
///
/// # Examples
///
/// ```
/// use ping_pet::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("ping-pet"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_default()
        .join("ping-pet")
}

/// Expands a leading `~` to the user's home directory.
///
/// Both `~/` and `~\` prefixes are recognized. Paths without a leading `~`,
/// and all paths when no home directory is known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use ping_pet::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative/~/path"), "relative/~/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.to_string();
    };

    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        home.join(rest).to_string_lossy().into_owned()
    } else if path == "~" {
        home.to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_against_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            PathBuf::from(expand_tilde("~/todo.txt")),
            home.join("todo.txt")
        );
        assert_eq!(expand_tilde("~"), home.to_string_lossy());
    }

    #[test]
    fn data_dir_lives_under_platform_data_dir() {
        let Some(base) = dirs::data_local_dir() else {
            return;
        };
        let data_dir = get_data_dir();
        assert!(data_dir.is_absolute());
        assert_eq!(data_dir, base.join("ping-pet"));
    }
}
