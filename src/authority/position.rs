//! Single source of truth for the sprite window's coordinates.

use crate::domain::{ScreenMetrics, Tuning, WindowPosition};
use crate::surface::{DisplayProvider, WindowSurface};

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The surface accepted the move.
    Moved(WindowPosition),
    /// The rounded position equals the current one; nothing was sent.
    Unchanged,
    /// The surface rejected the move; the cached position is untouched.
    Failed,
}

impl MoveOutcome {
    /// Whether the caller should treat the request as acknowledged.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Owns the sprite surface and the display provider.
///
/// Every mutation of the sprite position goes through [`set_position`], so
/// reads through [`position`] always return the last value the surface
/// accepted.
///
/// [`set_position`]: PositionAuthority::set_position
/// [`position`]: PositionAuthority::position
pub struct PositionAuthority {
    sprite: Box<dyn WindowSurface>,
    display: Box<dyn DisplayProvider>,
    position: WindowPosition,
    sprite_size: i32,
}

impl std::fmt::Debug for PositionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionAuthority")
            .field("position", &self.position)
            .field("sprite_size", &self.sprite_size)
            .finish_non_exhaustive()
    }
}

impl PositionAuthority {
    #[must_use]
    pub fn new(
        sprite: Box<dyn WindowSurface>,
        display: Box<dyn DisplayProvider>,
        sprite_size: i32,
    ) -> Self {
        Self {
            sprite,
            display,
            position: WindowPosition::default(),
            sprite_size,
        }
    }

    #[must_use]
    pub const fn position(&self) -> WindowPosition {
        self.position
    }

    /// Returns the primary work area, or a zero-sized fallback if the display
    /// provider fails.
    pub fn screen_metrics(&self) -> ScreenMetrics {
        self.display.work_area().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "screen metrics unavailable, using zero-sized fallback");
            ScreenMetrics::zero()
        })
    }

    /// Configures the sprite surface and places it on the resting line near the
    /// right edge of the work area.
    ///
    /// Unlike [`set_position`](Self::set_position) this always issues the move,
    /// since nothing has been placed yet.
    pub fn place_at_spawn(&mut self, tuning: &Tuning) -> MoveOutcome {
        let metrics = self.screen_metrics();
        let spawn = WindowPosition::new(
            metrics.width - tuning.spawn_inset,
            metrics.resting_line(tuning.resting_offset),
        );

        for (step, result) in [
            ("always on top", self.sprite.set_always_on_top(true)),
            ("skip taskbar", self.sprite.set_skip_taskbar(true)),
        ] {
            if let Err(e) = result {
                tracing::warn!(step, error = %e, "sprite surface setup failed");
            }
        }

        let outcome = self.apply(spawn);
        if let Err(e) = self.sprite.show() {
            tracing::warn!(error = %e, "failed to show sprite surface");
        }
        tracing::info!(x = spawn.x, y = spawn.y, ?outcome, "sprite spawned");
        outcome
    }

    /// Moves the sprite to `(x, y)` rounded to whole pixels.
    ///
    /// A request that rounds to the current position sends nothing to the
    /// surface and reports [`MoveOutcome::Unchanged`].
    pub fn set_position(&mut self, x: f64, y: f64) -> MoveOutcome {
        let target = WindowPosition::rounded(x, y);
        if target == self.position {
            tracing::trace!(x = target.x, y = target.y, "position unchanged");
            return MoveOutcome::Unchanged;
        }
        self.apply(target)
    }

    fn apply(&mut self, target: WindowPosition) -> MoveOutcome {
        match self
            .sprite
            .set_bounds(target, self.sprite_size, self.sprite_size)
        {
            Ok(()) => {
                self.position = target;
                MoveOutcome::Moved(target)
            }
            Err(e) => {
                tracing::warn!(x = target.x, y = target.y, error = %e, "sprite move rejected");
                MoveOutcome::Failed
            }
        }
    }
}
