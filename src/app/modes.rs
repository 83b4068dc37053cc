//! Sprite visual state machine.
//!
//! The sprite's imagery is derived from an explicit [`SpriteMode`] plus a hover
//! overlay flag, never inferred from which asset happens to be displayed.
//!
//! # State Machine
//!
//! - **Idle**: resting; combinable with the hover overlay ("interested")
//! - **Held**: being dragged for longer than the hold delay
//! - **Falling**: released and under gravity
//!
//! `Held` and `Falling` take precedence over hover for imagery.

use crate::domain::{ScreenMetrics, WindowPosition};

/// Primary visual mode of the sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpriteMode {
    #[default]
    Idle,
    Held,
    Falling,
}

/// Derived visual state: mode, hover overlay, and facing direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteState {
    pub mode: SpriteMode,

    /// Pointer is over the sprite and the sprite is idle.
    pub hovering: bool,

    /// Sprite's X lies left of the screen midpoint.
    pub on_left: bool,
}

impl SpriteState {
    /// Recomputes the facing direction from the sprite's current position.
    ///
    /// Returns whether it changed.
    pub fn update_direction(&mut self, position: WindowPosition, metrics: &ScreenMetrics) -> bool {
        let on_left = position.is_on_left(metrics);
        let changed = on_left != self.on_left;
        self.on_left = on_left;
        changed
    }

    /// Whether the artwork is drawn mirrored.
    ///
    /// The falling artwork faces the opposite way from every other mode for the
    /// same side of the screen. This asymmetry is intentional.
    #[must_use]
    pub const fn mirrored(&self) -> bool {
        match self.mode {
            SpriteMode::Falling => !self.on_left,
            SpriteMode::Idle | SpriteMode::Held => self.on_left,
        }
    }

    /// Whether the hover overlay is visible: only an idle sprite shows it.
    #[must_use]
    pub const fn shows_hover(&self) -> bool {
        self.hovering && matches!(self.mode, SpriteMode::Idle)
    }
}
