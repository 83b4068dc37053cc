//! Interaction and physics constants.
//!
//! Every timing threshold and pixel offset the state machines depend on lives
//! in [`Tuning`] so tests and configuration files can adjust them without
//! touching the logic. Defaults match the feel of the shipped sprite.

use super::geometry::BubbleLayout;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable constants for drag, fall, hover, and placement behavior.
///
/// Deserializes from the `[tuning]` table of the TOML configuration file;
/// missing keys keep their defaults.
///
/// ```toml
/// [tuning]
/// resting_offset = 45
/// acceleration = 0.5
/// drag_threshold_px = 5.0
/// hold_delay_ms = 100
///
/// [tuning.bubble]
/// width = 320
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance between the bottom of the work area and the resting line.
    pub resting_offset: i32,

    /// Velocity gained per fall tick, in pixels per tick.
    pub acceleration: f64,

    /// Pointer travel beyond which a press becomes a drag.
    pub drag_threshold_px: f64,

    /// Minimum press duration before the held sprite is shown.
    pub hold_delay_ms: u64,

    /// Grace window before the bubble hides after the pointer leaves the
    /// combined sprite/bubble hover region.
    pub hover_grace_ms: u64,

    /// Delay between landing and returning to the idle sprite.
    pub settle_delay_ms: u64,

    /// Interval between fall ticks when no display refresh signal is available.
    pub frame_interval_ms: u64,

    /// Side length of the square sprite surface.
    pub sprite_size: i32,

    /// Horizontal distance from the right edge of the work area at spawn.
    pub spawn_inset: i32,

    /// Bubble surface geometry.
    pub bubble: BubbleLayout,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            resting_offset: 45,
            acceleration: 0.5,
            drag_threshold_px: 5.0,
            hold_delay_ms: 100,
            hover_grace_ms: 100,
            settle_delay_ms: 50,
            frame_interval_ms: 16,
            sprite_size: 50,
            spawn_inset: 100,
            bubble: BubbleLayout::default(),
        }
    }
}

impl Tuning {
    #[must_use]
    pub const fn hold_delay(&self) -> Duration {
        Duration::from_millis(self.hold_delay_ms)
    }

    #[must_use]
    pub const fn hover_grace(&self) -> Duration {
        Duration::from_millis(self.hover_grace_ms)
    }

    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
