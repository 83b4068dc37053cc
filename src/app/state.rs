//! Presentation-side state and view model computation.
//!
//! [`AppState`] is the presentation process's whole world: a locally cached
//! copy of the authority's position, metrics and bubble state (kept current
//! by pushes), the one active session that owns position writes, and the
//! derived sprite visual state.
//!
//! # State Components
//!
//! - **Caches**: position, screen metrics, bubble mirror, content rows
//! - **Session**: drag, fall or settle, exclusively
//! - **Sprite**: visual mode, hover overlay, facing direction
//! - **Hover**: combined sprite/bubble region with grace tokens

use super::hover::HoverRegion;
use super::modes::{SpriteMode, SpriteState};
use super::session::{ActiveSession, GenerationCounter};
use crate::authority::BubbleState;
use crate::content::NotificationRow;
use crate::domain::{ScreenMetrics, Tuning, WindowPosition};
use crate::ui::viewmodel::{BubbleView, SpriteAsset, SpriteView, ViewModel};

/// Central presentation state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Interaction and physics constants.
    pub tuning: Tuning,

    /// Last known sprite position.
    ///
    /// Updated optimistically on every move request and overwritten by
    /// `PositionChanged` pushes, so no round trip is needed per pointer move.
    pub position: WindowPosition,

    /// Last known work area.
    pub metrics: ScreenMetrics,

    /// Session owning position writes.
    pub session: ActiveSession,

    pub generations: GenerationCounter,

    pub sprite: SpriteState,

    pub hover: HoverRegion,

    /// Mirror of the authority's bubble state.
    pub bubble: BubbleState,

    /// Rows of the latest content push.
    pub rows: Vec<NotificationRow>,

    /// Unix timestamp of the latest content read, if any has arrived.
    pub content_read_at: Option<i64>,
}

impl AppState {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            position: WindowPosition::default(),
            metrics: ScreenMetrics::zero(),
            session: ActiveSession::None,
            generations: GenerationCounter::default(),
            sprite: SpriteState::default(),
            hover: HoverRegion::default(),
            bubble: BubbleState::default(),
            rows: Vec::new(),
            content_read_at: None,
        }
    }

    /// Y coordinate the sprite rests on, from the cached metrics.
    #[must_use]
    pub const fn resting_line(&self) -> i32 {
        self.metrics.resting_line(self.tuning.resting_offset)
    }

    /// Records a new sprite position and refreshes the facing direction.
    ///
    /// Returns whether anything visible changed.
    pub fn set_position(&mut self, position: WindowPosition) -> bool {
        let moved = self.position != position;
        self.position = position;
        let turned = self.sprite.update_direction(position, &self.metrics);
        moved || turned
    }

    pub fn set_mode(&mut self, mode: SpriteMode) -> bool {
        let changed = self.sprite.mode != mode;
        if changed {
            tracing::debug!(from = ?self.sprite.mode, to = ?mode, "sprite mode changed");
        }
        self.sprite.mode = mode;
        changed
    }

    /// Computes the renderable view of the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ViewModel {
        let asset = match self.sprite.mode {
            SpriteMode::Held => SpriteAsset::Held,
            SpriteMode::Falling => SpriteAsset::Falling,
            SpriteMode::Idle if self.sprite.shows_hover() || self.bubble.pinned => SpriteAsset::Interested,
            SpriteMode::Idle => SpriteAsset::Idle,
        };

        let bubble = self.bubble.visible.then(|| BubbleView {
            position: self.bubble.position,
            pinned: self.bubble.pinned,
            rows: self.rows.clone(),
        });

        ViewModel {
            sprite: SpriteView {
                asset,
                mirrored: self.sprite.mirrored(),
                position: self.position,
            },
            bubble,
            session: self.session.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_sprite_uses_idle_asset() {
        let state = AppState::new(Tuning::default());
        let vm = state.compute_viewmodel();
        assert_eq!(vm.sprite.asset, SpriteAsset::Idle);
        assert!(vm.bubble.is_none());
    }

    #[test]
    fn hover_is_overridden_by_held() {
        let mut state = AppState::new(Tuning::default());
        state.sprite.hovering = true;
        assert_eq!(state.compute_viewmodel().sprite.asset, SpriteAsset::Interested);

        state.set_mode(SpriteMode::Held);
        assert_eq!(state.compute_viewmodel().sprite.asset, SpriteAsset::Held);
    }

    #[test]
    fn position_updates_direction() {
        let mut state = AppState::new(Tuning::default());
        state.metrics = ScreenMetrics::new(1920, 1080);
        assert!(state.set_position(WindowPosition::new(10, 10)));
        assert!(state.sprite.on_left);
        assert!(!state.set_position(WindowPosition::new(10, 10)));
    }
}
