//! Domain layer for the desktop pet.
//!
//! This module contains the core value types shared by both sides of the
//! process boundary, independent of any windowing API or transport. The
//! presentation side and the position authority agree on these types and
//! nothing else.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`geometry`]: Positions, screen metrics, and the bubble placement rule
//! - [`tuning`]: Interaction and physics constants
//!
//! # Examples
//!
//! ```
//! use ping_pet::domain::{ScreenMetrics, Tuning};
//!
//! let tuning = Tuning::default();
//! let screen = ScreenMetrics::new(1920, 1080);
//! assert_eq!(screen.resting_line(tuning.resting_offset), 1035);
//! ```

pub mod error;
pub mod geometry;
pub mod tuning;

pub use error::{PetError, Result};
pub use geometry::{bubble_placement, BubbleLayout, Point, ScreenMetrics, WindowPosition};
pub use tuning::Tuning;
