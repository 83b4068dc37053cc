//! View model types representing renderable UI state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no interaction logic, only display-ready data.
//! The sprite asset is chosen from an explicit enum; nothing downstream ever
//! recovers state by looking at which image is shown.
//!
//! # Example
//!
//! ```rust
//! use ping_pet::ui::viewmodel::{SpriteAsset, SpriteView};
//! use ping_pet::domain::WindowPosition;
//!
//! let sprite = SpriteView {
//!     asset: SpriteAsset::Falling,
//!     mirrored: true,
//!     position: WindowPosition::new(50, 700),
//! };
//! assert_eq!(sprite.file_name(), "ping-falling-left.png");
//! ```

use crate::content::NotificationRow;
use crate::domain::WindowPosition;

/// Artwork shown for the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteAsset {
    Idle,
    /// Idle with the pointer over it, or with the bubble pinned.
    Interested,
    Held,
    Falling,
}

impl SpriteAsset {
    /// File stem of the right-facing artwork.
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Idle => "ping-idle",
            Self::Interested => "ping-idle-improve",
            Self::Held => "ping-raise",
            Self::Falling => "ping-falling",
        }
    }
}

/// Renderable sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteView {
    pub asset: SpriteAsset,

    /// Draw the left-facing variant.
    pub mirrored: bool,

    pub position: WindowPosition,
}

impl SpriteView {
    /// Asset file for this view, with the `-left` suffix when mirrored.
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.mirrored {
            format!("{}-left.png", self.asset.stem())
        } else {
            format!("{}.png", self.asset.stem())
        }
    }
}

/// Renderable bubble, present only while visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleView {
    pub position: WindowPosition,
    pub pinned: bool,
    pub rows: Vec<NotificationRow>,
}

/// Complete view model for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub sprite: SpriteView,
    pub bubble: Option<BubbleView>,

    /// Name of the active session, for diagnostics.
    pub session: &'static str,
}
