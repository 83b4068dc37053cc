//! Pointer gesture interpretation: click versus drag.

use crate::app::session::Generation;
use crate::domain::{Point, WindowPosition};
use std::time::{Duration, Instant};

/// Whether the pointer has travelled far enough to count as a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed, still within the click threshold.
    Pending,
    /// Past the threshold; the sprite follows the pointer.
    Dragging,
}

/// One pointer-down-to-up gesture on the sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    generation: Generation,
    pointer_start: Point,
    /// `pointer_start - origin`, fixed for the whole gesture.
    offset: Point,
    started_at: Instant,
    phase: DragPhase,
}

impl DragSession {
    #[must_use]
    pub fn start(pointer: Point, origin: WindowPosition, at: Instant, generation: Generation) -> Self {
        Self {
            generation,
            pointer_start: pointer,
            offset: Point::new(
                pointer.x - f64::from(origin.x),
                pointer.y - f64::from(origin.y),
            ),
            started_at: at,
            phase: DragPhase::Pending,
        }
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Time since the pointer went down, saturating at zero.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Whether the held sprite should be shown: dragging, and pressed for
    /// strictly longer than `hold_delay`.
    #[must_use]
    pub fn shows_held(&self, now: Instant, hold_delay: Duration) -> bool {
        self.phase == DragPhase::Dragging && self.elapsed(now) > hold_delay
    }

    /// Feeds a pointer move into the gesture.
    ///
    /// Returns `true` if this move promoted the gesture from pending to
    /// dragging.
    pub fn track(&mut self, pointer: Point, threshold: f64) -> bool {
        if self.phase == DragPhase::Pending && pointer.displacement_from(&self.pointer_start) > threshold {
            self.phase = DragPhase::Dragging;
            return true;
        }
        false
    }

    /// Sprite position for `pointer`, never below `resting_line`.
    #[must_use]
    pub fn target(&self, pointer: Point, resting_line: i32) -> WindowPosition {
        let x = pointer.x - self.offset.x;
        let y = (pointer.y - self.offset.y).min(f64::from(resting_line));
        WindowPosition::rounded(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (DragSession, Instant) {
        let now = Instant::now();
        let drag = DragSession::start(
            Point::new(1890.0, 1060.0),
            WindowPosition::new(1870, 1035),
            now,
            Generation::default(),
        );
        (drag, now)
    }

    #[test]
    fn offset_is_fixed_at_start() {
        let (drag, _) = session();
        assert_eq!(drag.target(Point::new(1890.0, 1060.0), 1035), WindowPosition::new(1870, 1035));
        assert_eq!(drag.target(Point::new(70.0, 525.0), 1035), WindowPosition::new(50, 500));
    }

    #[test]
    fn small_moves_stay_pending() {
        let (mut drag, _) = session();
        assert!(!drag.track(Point::new(1893.0, 1064.0), 5.0));
        assert_eq!(drag.phase(), DragPhase::Pending);

        assert!(drag.track(Point::new(1896.0, 1060.0), 5.0));
        assert_eq!(drag.phase(), DragPhase::Dragging);
        assert!(!drag.track(Point::new(1000.0, 1000.0), 5.0));
    }

    #[test]
    fn target_is_clamped_to_resting_line() {
        let (drag, _) = session();
        let below = drag.target(Point::new(520.0, 1500.0), 1035);
        assert_eq!(below, WindowPosition::new(500, 1035));
    }

    #[test]
    fn held_visual_waits_for_hold_delay() {
        let (mut drag, start) = session();
        let delay = Duration::from_millis(100);
        drag.track(Point::new(1900.0, 1060.0), 5.0);

        assert!(!drag.shows_held(start + Duration::from_millis(40), delay));
        assert!(!drag.shows_held(start + delay, delay));
        assert!(drag.shows_held(start + Duration::from_millis(101), delay));
    }
}
