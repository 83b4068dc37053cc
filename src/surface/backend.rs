//! Window-surface and display capability abstractions.
//!
//! This module defines the [`WindowSurface`] and [`DisplayProvider`] traits that
//! abstract over the platform's windowing primitives. The position authority and
//! the bubble controller call these capabilities but never implement them,
//! so the state machines stay independent of any particular windowing toolkit.
//!
//! # Design Philosophy
//!
//! The traits are minimal and map one-to-one onto the primitives the authority
//! actually needs: move with fixed bounds, show, hide, stacking, and taskbar
//! visibility. Creation and asset loading belong to whoever constructs the
//! surface.

use crate::domain::error::Result;
use crate::domain::{ScreenMetrics, WindowPosition};

/// A top-level, frameless window surface owned by the authority.
///
/// Implementations must be `Send` because the authority runs on its own
/// thread of control.
///
/// # Implementations
///
/// - [`HeadlessSurface`](crate::surface::HeadlessSurface): records calls in
///   memory (used by the headless runtime and tests)
pub trait WindowSurface: Send {
    /// Moves the surface so its top-left corner is at `position` and forces its
    /// size to `width` x `height`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the move.
    fn set_bounds(&mut self, position: WindowPosition, width: i32, height: i32) -> Result<()>;

    /// Makes the surface visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot show the surface.
    fn show(&mut self) -> Result<()>;

    /// Hides the surface without destroying it.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot hide the surface.
    fn hide(&mut self) -> Result<()>;

    /// Keeps the surface above all normal windows.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform does not support stacking changes.
    fn set_always_on_top(&mut self, on_top: bool) -> Result<()>;

    /// Hides the surface from the OS taskbar.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform does not support the flag.
    fn set_skip_taskbar(&mut self, skip: bool) -> Result<()>;
}

/// Source of primary-display geometry.
pub trait DisplayProvider: Send {
    /// Returns the usable work area of the primary display.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot report display geometry.
    fn work_area(&self) -> Result<ScreenMetrics>;
}
