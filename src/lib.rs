//! Ping Pet: a desktop pet overlay.
//!
//! A small always-on-top sprite sits on the resting line at the bottom of the
//! screen. It can be dragged anywhere, falls back under gravity when released,
//! and shows a bubble with the current todo and mail notifications when
//! hovered. A click pins the bubble open.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Headless runtime (main.rs)                         │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Event loop, timers,
//! │  - Driver, TimerQueue, transports                   │    authority thread
//! └─────────────────────────────────────────────────────┘
//!         │                                       │
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │ Presentation (app/, ui/) │  JSON  │ Authority (authority/)   │
//! │ - Drag interpreter       │ ─────▶ │ - Position authority     │
//! │ - Fall physics           │ ◀───── │ - Bubble controller      │
//! │ - Sprite / hover state   │ pushes │ - Content source         │
//! └──────────────────────────┘        └──────────────────────────┘
//!                                                 │
//! ┌─────────────────────────────────────────────────────┐
//! │  Surfaces (surface/), content (content/),           │
//! │  domain types (domain/), paths (infrastructure/)    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - stderr log lines, file-based OTLP span export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Presentation state machine with event/action model
//! - [`authority`]: Owner of window positions, bubble state and content
//! - [`content`]: Todo file reading, row grouping and change watching
//! - [`domain`]: Geometry, tuning constants and errors
//! - [`infrastructure`]: Data directory and path expansion
//! - [`observability`]: Tracing setup
//! - [`runtime`]: Driver, timers, authority thread and transports
//! - [`surface`]: Window and display capabilities
//! - [`ui`]: View model and status-line rendering
//!
//! # Configuration
//!
//! Defaults, then an optional TOML file, then `key=value` overrides:
//!
//! ```toml
//! todo_path = "~/todo.txt"
//! trace_level = "debug"
//! screen = { width = 2560, height = 1440 }
//!
//! [tuning]
//! acceleration = 0.8
//! ```
//!
//! # Example
//!
//! ```rust
//! use ping_pet::runtime::{Driver, InProcessTransport};
//! use ping_pet::surface::{FixedDisplay, HeadlessSurface};
//! use ping_pet::authority::{Authority, AuthorityParts};
//! use ping_pet::domain::ScreenMetrics;
//! use ping_pet::{initialize, Config};
//! use std::time::Instant;
//!
//! let config = Config::default();
//! let mut transport = InProcessTransport::new(Authority::new(AuthorityParts {
//!     sprite: Box::new(HeadlessSurface::new("sprite")),
//!     bubble: Box::new(HeadlessSurface::new("bubble")),
//!     display: Box::new(FixedDisplay::new(ScreenMetrics::new(1920, 1080))),
//!     todo_path: std::env::temp_dir().join("ping-pet-doc-missing.txt"),
//!     tuning: config.tuning.clone(),
//! }));
//! transport.start();
//!
//! let mut driver = Driver::new(initialize(&config), transport);
//! driver.start(Instant::now())?;
//! assert_eq!(driver.state().position.y, 1035);
//! # Ok::<(), ping_pet::PetError>(())
//! ```

pub mod app;
pub mod authority;
pub mod content;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod surface;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{PetError, Result, Tuning};

use domain::ScreenMetrics;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Todo/notification file shown in the bubble.
    ///
    /// Default: `todo.txt` in [`get_data_dir`](infrastructure::get_data_dir)
    pub todo_path: PathBuf,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Work area reported by the headless display instead of 1920x1080.
    pub screen_override: Option<ScreenMetrics>,

    pub tuning: Tuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            todo_path: infrastructure::get_data_dir().join("todo.txt"),
            trace_level: None,
            screen_override: None,
            tuning: Tuning::default(),
        }
    }
}

/// On-disk layout of the configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    todo_path: Option<String>,
    trace_level: Option<String>,
    screen: Option<ScreenMetrics>,
    tuning: Option<Tuning>,
}

impl Config {
    /// Loads a TOML configuration file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::Io`] if the file cannot be read and
    /// [`PetError::Config`] if it is not valid configuration TOML.
    ///
    /// ```rust
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("ping-pet.toml");
    /// std::fs::write(&path, "trace_level = \"debug\"\n[tuning]\nacceleration = 1.0\n")?;
    ///
    /// let config = ping_pet::Config::from_file(&path)?;
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert_eq!(config.tuning.acceleration, 1.0);
    /// assert_eq!(config.tuning.resting_offset, 45);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&text)
            .map_err(|e| PetError::Config(format!("{}: {e}", path.display())))?;

        let defaults = Self::default();
        Ok(Self {
            todo_path: file
                .todo_path
                .map_or(defaults.todo_path, |p| PathBuf::from(infrastructure::expand_tilde(&p))),
            trace_level: file.trace_level,
            screen_override: file.screen,
            tuning: file.tuning.unwrap_or(defaults.tuning),
        })
    }

    /// Applies `key=value` overrides, as given on the command line.
    ///
    /// Unknown keys are ignored and unparsable values keep the current value.
    ///
    /// | key | value |
    /// |---|---|
    /// | `todo_path` | path, `~/` expanded |
    /// | `trace_level` | filter directive |
    /// | `screen` | `WIDTHxHEIGHT` |
    /// | any [`Tuning`] scalar field | number |
    /// | `bubble_width`, `bubble_height` | number |
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use ping_pet::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("screen".to_string(), "2560x1440".to_string());
    /// map.insert("acceleration".to_string(), "fast".to_string());
    ///
    /// let config = Config::default().from_map(&map);
    /// assert_eq!(config.screen_override.map(|s| s.width), Some(2560));
    /// assert_eq!(config.tuning.acceleration, 0.5);
    /// ```
    #[must_use]
    pub fn from_map(&self, map: &BTreeMap<String, String>) -> Self {
        let mut config = self.clone();

        if let Some(path) = map.get("todo_path").filter(|p| !p.trim().is_empty()) {
            config.todo_path = PathBuf::from(infrastructure::expand_tilde(path.trim()));
        }
        if let Some(level) = map.get("trace_level") {
            config.trace_level = Some(level.trim().to_string());
        }
        if let Some(screen) = map.get("screen").and_then(|s| parse_screen(s)) {
            config.screen_override = Some(screen);
        }

        let t = &mut config.tuning;
        t.resting_offset = parse_or(map, "resting_offset", t.resting_offset);
        t.acceleration = parse_or(map, "acceleration", t.acceleration);
        t.drag_threshold_px = parse_or(map, "drag_threshold_px", t.drag_threshold_px);
        t.hold_delay_ms = parse_or(map, "hold_delay_ms", t.hold_delay_ms);
        t.hover_grace_ms = parse_or(map, "hover_grace_ms", t.hover_grace_ms);
        t.settle_delay_ms = parse_or(map, "settle_delay_ms", t.settle_delay_ms);
        t.frame_interval_ms = parse_or(map, "frame_interval_ms", t.frame_interval_ms);
        t.sprite_size = parse_or(map, "sprite_size", t.sprite_size);
        t.spawn_inset = parse_or(map, "spawn_inset", t.spawn_inset);
        t.bubble.width = parse_or(map, "bubble_width", t.bubble.width);
        t.bubble.height = parse_or(map, "bubble_height", t.bubble.height);

        config
    }
}

fn parse_or<T: FromStr>(map: &BTreeMap<String, String>, key: &str, current: T) -> T {
    match map.get(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            tracing::warn!(key, value = ?map.get(key), "ignoring unparsable configuration value");
            current
        }
        None => current,
    }
}

fn parse_screen(value: &str) -> Option<ScreenMetrics> {
    let (width, height) = value.trim().split_once(['x', 'X'])?;
    let width = width.trim().parse().ok()?;
    let height = height.trim().parse().ok()?;
    Some(ScreenMetrics::new(width, height))
}

/// Creates the presentation state for `config`.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(todo_path = %config.todo_path.display(), "initializing ping-pet");
    AppState::new(config.tuning.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn map_overrides_tuning_and_keeps_unparsable() {
        let config = Config::default().from_map(&map(&[
            ("hold_delay_ms", "250"),
            ("resting_offset", "sixty"),
            ("bubble_width", " 400 "),
            ("unknown", "1"),
        ]));

        assert_eq!(config.tuning.hold_delay_ms, 250);
        assert_eq!(config.tuning.resting_offset, 45);
        assert_eq!(config.tuning.bubble.width, 400);
    }

    #[test]
    fn map_layers_over_existing_values() {
        let base = Config::default().from_map(&map(&[("acceleration", "2.0")]));
        let layered = base.from_map(&map(&[("trace_level", "debug")]));

        assert_eq!(layered.tuning.acceleration, 2.0);
        assert_eq!(layered.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn screen_override_parses_width_by_height() {
        assert_eq!(parse_screen("1280x720"), Some(ScreenMetrics::new(1280, 720)));
        assert_eq!(parse_screen("1280 X 720"), Some(ScreenMetrics::new(1280, 720)));
        assert_eq!(parse_screen("1280"), None);
        assert_eq!(parse_screen("wide x tall"), None);
    }

    #[test]
    fn file_sets_screen_and_todo_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ping-pet.toml");
        std::fs::write(
            &path,
            "todo_path = \"/tmp/todo.txt\"\n\n[screen]\nwidth = 800\nheight = 600\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.todo_path, PathBuf::from("/tmp/todo.txt"));
        assert_eq!(config.screen_override, Some(ScreenMetrics::new(800, 600)));
        assert_eq!(config.tuning, Tuning::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "acceleration = [").unwrap();

        assert!(matches!(Config::from_file(&path), Err(PetError::Config(_))));
    }
}
