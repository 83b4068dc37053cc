//! User interface layer.
//!
//! Transforms presentation state into display-ready view models and renders
//! them. The headless renderer prints one status line per frame.
//!
//! ```text
//! AppState → compute_viewmodel → ViewModel → render → status line
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Sprite and bubble view models, asset selection
//! - [`renderer`]: Status-line rendering

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, status_line};
pub use viewmodel::{BubbleView, SpriteAsset, SpriteView, ViewModel};
