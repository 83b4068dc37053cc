//! Authority-side ownership of the notification bubble surface.
//!
//! The controller only positions and toggles the surface. Content is pushed to
//! the presentation side separately; the bubble never parses it.

use crate::domain::{bubble_placement, BubbleLayout, ScreenMetrics, WindowPosition};
use crate::surface::WindowSurface;
use serde::{Deserialize, Serialize};

/// Visibility, pin state and placement of the bubble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleState {
    pub visible: bool,
    pub pinned: bool,
    pub position: WindowPosition,
}

/// Shows, hides, pins and places the bubble surface.
pub struct BubbleController {
    surface: Box<dyn WindowSurface>,
    layout: BubbleLayout,
    state: BubbleState,
}

impl std::fmt::Debug for BubbleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BubbleController")
            .field("layout", &self.layout)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl BubbleController {
    /// Wraps `surface`, marking it always-on-top and hidden from the taskbar.
    ///
    /// The surface starts hidden.
    #[must_use]
    pub fn new(mut surface: Box<dyn WindowSurface>, layout: BubbleLayout) -> Self {
        for (step, result) in [
            ("always on top", surface.set_always_on_top(true)),
            ("skip taskbar", surface.set_skip_taskbar(true)),
        ] {
            if let Err(e) = result {
                tracing::warn!(step, error = %e, "bubble surface setup failed");
            }
        }

        Self {
            surface,
            layout,
            state: BubbleState::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> BubbleState {
        self.state
    }

    /// Places the bubble next to a sprite at `anchor` and shows it.
    ///
    /// Returns whether the observable state changed.
    pub fn show_at(&mut self, anchor: WindowPosition, metrics: &ScreenMetrics) -> bool {
        let before = self.state;
        self.place(anchor, metrics);

        if !self.state.visible {
            match self.surface.show() {
                Ok(()) => self.state.visible = true,
                Err(e) => tracing::warn!(error = %e, "failed to show bubble"),
            }
        }

        self.state != before
    }

    /// Hides the bubble. Does nothing while pinned.
    pub fn hide(&mut self) -> bool {
        if self.state.pinned {
            tracing::debug!("hide suppressed, bubble is pinned");
            return false;
        }
        if !self.state.visible {
            return false;
        }

        if let Err(e) = self.surface.hide() {
            tracing::warn!(error = %e, "failed to hide bubble");
        }
        self.state.visible = false;
        true
    }

    /// Sets the pin flag. Pinning also forces the bubble visible at `anchor`
    /// and re-asserts its stacking above other windows.
    ///
    /// Unpinning leaves the bubble visible; the next hide takes effect.
    pub fn set_pinned(&mut self, pinned: bool, anchor: WindowPosition, metrics: &ScreenMetrics) -> bool {
        let before = self.state;
        self.state.pinned = pinned;

        if pinned {
            if let Err(e) = self.surface.set_always_on_top(true) {
                tracing::warn!(error = %e, "failed to raise pinned bubble");
            }
            self.show_at(anchor, metrics);
        }

        tracing::debug!(pinned, "bubble pin changed");
        self.state != before
    }

    /// Re-derives the placement for a sprite now at `anchor`.
    ///
    /// A hidden bubble only records the new placement.
    pub fn reposition(&mut self, anchor: WindowPosition, metrics: &ScreenMetrics) -> bool {
        let before = self.state;
        self.place(anchor, metrics);
        self.state != before
    }

    fn place(&mut self, anchor: WindowPosition, metrics: &ScreenMetrics) {
        let target = bubble_placement(anchor, metrics, &self.layout);
        if target == self.state.position && self.state.visible {
            return;
        }

        match self
            .surface
            .set_bounds(target, self.layout.width, self.layout.height)
        {
            Ok(()) => self.state.position = target,
            Err(e) => tracing::warn!(x = target.x, y = target.y, error = %e, "bubble move rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{HeadlessSurface, SurfaceCall, SurfaceRecorder};

    const SCREEN: ScreenMetrics = ScreenMetrics::new(1920, 1080);

    fn controller() -> (BubbleController, SurfaceRecorder) {
        let surface = HeadlessSurface::new("bubble");
        let recorder = surface.recorder();
        (BubbleController::new(Box::new(surface), BubbleLayout::default()), recorder)
    }

    #[test]
    fn show_places_by_screen_half() {
        let (mut bubble, _) = controller();

        bubble.show_at(WindowPosition::new(100, 1035), &SCREEN);
        assert_eq!(bubble.state().position, WindowPosition::new(160, 975));
        assert!(bubble.state().visible);

        bubble.show_at(WindowPosition::new(1800, 1035), &SCREEN);
        assert_eq!(bubble.state().position, WindowPosition::new(1470, 975));
    }

    #[test]
    fn hide_is_suppressed_while_pinned() {
        let (mut bubble, recorder) = controller();
        bubble.set_pinned(true, WindowPosition::new(100, 500), &SCREEN);

        assert!(!bubble.hide());
        assert!(bubble.state().visible);
        assert_eq!(recorder.count(SurfaceCall::Hide), 0);
    }

    #[test]
    fn unpin_then_hide_hides_once() {
        let (mut bubble, recorder) = controller();
        bubble.set_pinned(true, WindowPosition::new(100, 500), &SCREEN);
        bubble.set_pinned(false, WindowPosition::new(100, 500), &SCREEN);

        assert!(bubble.hide());
        assert!(!bubble.hide());
        assert_eq!(recorder.count(SurfaceCall::Hide), 1);
    }

    #[test]
    fn pin_raises_and_shows() {
        let (mut bubble, recorder) = controller();
        recorder.clear();

        bubble.set_pinned(true, WindowPosition::new(100, 500), &SCREEN);

        assert_eq!(recorder.count(SurfaceCall::AlwaysOnTop(true)), 1);
        assert_eq!(recorder.count(SurfaceCall::Show), 1);
        assert!(bubble.state().pinned && bubble.state().visible);
    }

    #[test]
    fn reposition_follows_the_sprite_across_the_midpoint() {
        let (mut bubble, recorder) = controller();
        bubble.show_at(WindowPosition::new(900, 500), &SCREEN);
        recorder.clear();

        assert!(bubble.reposition(WindowPosition::new(1000, 500), &SCREEN));
        assert_eq!(recorder.moves(), vec![WindowPosition::new(670, 440)]);
        assert!(!bubble.reposition(WindowPosition::new(1000, 500), &SCREEN));
    }
}
