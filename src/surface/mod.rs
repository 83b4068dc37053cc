//! Window-surface primitives and display geometry.
//!
//! The authority treats windows and displays as capabilities supplied at
//! startup. This module holds the capability traits and the headless
//! implementations used when no windowing system is attached.
//!
//! # Modules
//!
//! - `backend`: [`WindowSurface`] and [`DisplayProvider`] traits
//! - `headless`: recording surface and fixed display implementations

pub mod backend;
pub mod headless;

pub use backend::{DisplayProvider, WindowSurface};
pub use headless::{FixedDisplay, HeadlessSurface, SurfaceCall, SurfaceRecorder};
