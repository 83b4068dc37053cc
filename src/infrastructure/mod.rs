//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where data files live and expands user-supplied paths.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir};
