//! Top-level rendering coordinator for the headless runtime.
//!
//! Without a windowing system the "render" of a frame is a single status line
//! describing what a real surface would show: the sprite artwork and where it
//! sits, and the bubble with its rows if visible.
//!
//! # Example
//!
//! ```rust
//! use ping_pet::app::AppState;
//! use ping_pet::domain::Tuning;
//! use ping_pet::ui::renderer::status_line;
//!
//! let state = AppState::new(Tuning::default());
//! let line = status_line(&state.compute_viewmodel());
//! assert!(line.starts_with("sprite ping-idle.png @ (0, 0)"));
//! ```

use crate::app::AppState;
use crate::content::RowKind;
use crate::ui::viewmodel::ViewModel;
use std::fmt::Write as _;

/// Renders the current state to stdout as one line.
pub fn render(state: &AppState) {
    let viewmodel = state.compute_viewmodel();
    println!("{}", status_line(&viewmodel));
}

/// Formats a view model as a single status line.
#[must_use]
pub fn status_line(vm: &ViewModel) -> String {
    let mut line = format!(
        "sprite {} @ ({}, {}) [{}]",
        vm.sprite.file_name(),
        vm.sprite.position.x,
        vm.sprite.position.y,
        vm.session
    );

    if let Some(bubble) = &vm.bubble {
        let _ = write!(
            line,
            " | bubble{} @ ({}, {}):",
            if bubble.pinned { " (pinned)" } else { "" },
            bubble.position.x,
            bubble.position.y
        );
        for row in &bubble.rows {
            let marker = match row.kind {
                RowKind::Email => "✉",
                RowKind::Task => "•",
            };
            let _ = write!(line, " {marker} {}", row.text);
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NotificationRow;
    use crate::domain::WindowPosition;
    use crate::ui::viewmodel::{BubbleView, SpriteAsset, SpriteView};

    #[test]
    fn bubble_rows_are_listed() {
        let vm = ViewModel {
            sprite: SpriteView {
                asset: SpriteAsset::Interested,
                mirrored: false,
                position: WindowPosition::new(1820, 1035),
            },
            bubble: Some(BubbleView {
                position: WindowPosition::new(1490, 975),
                pinned: true,
                rows: vec![
                    NotificationRow {
                        kind: RowKind::Email,
                        text: "dana: hi".to_string(),
                    },
                    NotificationRow {
                        kind: RowKind::Task,
                        text: "ship it".to_string(),
                    },
                ],
            }),
            session: "none",
        };

        assert_eq!(
            status_line(&vm),
            "sprite ping-idle-improve.png @ (1820, 1035) [none] | bubble (pinned) @ (1490, 975): ✉ dana: hi • ship it"
        );
    }
}
