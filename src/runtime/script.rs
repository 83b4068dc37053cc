//! Scripted input for the headless runtime.
//!
//! Each line on stdin is one JSON object naming an input and, optionally, how
//! long to wait before delivering it:
//!
//! ```text
//! {"kind":"sprite_enter"}
//! {"kind":"pointer_down","x":1890,"y":1060}
//! {"kind":"pointer_move","x":70,"y":525,"delay_ms":200}
//! {"kind":"pointer_up","x":70,"y":525}
//! ```

use crate::app::Event;
use crate::domain::error::{PetError, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// One scripted user input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedInput {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    SpriteEnter,
    SpriteLeave,
    BubbleEnter,
    BubbleLeave,
    Escape,
}

/// A scripted input with its delivery delay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptLine {
    #[serde(default)]
    pub delay_ms: u64,

    #[serde(flatten)]
    pub input: ScriptedInput,
}

impl ScriptLine {
    /// Parses one line of script.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not a valid script object.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| PetError::Protocol(format!("bad script line {line:?}: {e}")))
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl ScriptedInput {
    /// Converts into an event observed at `at`.
    #[must_use]
    pub fn into_event(self, at: Instant) -> Event {
        match self {
            Self::PointerDown { x, y } => Event::PointerDown { x, y, at },
            Self::PointerMove { x, y } => Event::PointerMove { x, y, at },
            Self::PointerUp { x, y } => Event::PointerUp { x, y, at },
            Self::SpriteEnter => Event::SpriteEnter,
            Self::SpriteLeave => Event::SpriteLeave,
            Self::BubbleEnter => Event::BubbleEnter,
            Self::BubbleLeave => Event::BubbleLeave,
            Self::Escape => Event::Escape,
        }
    }
}
