//! Error types for the desktop pet.
//!
//! This module defines the centralized error type [`PetError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Almost every error is absorbed where it happens and replaced by a fallback
//! value (zero-sized metrics, a placeholder message, an unconfirmed move), so
//! these variants mostly travel as far as a log line.

use thiserror::Error;

/// The main error type for desktop pet operations.
///
/// # Examples
///
/// ```
/// use ping_pet::domain::PetError;
///
/// fn query_display() -> Result<(), PetError> {
///     Err(PetError::Display("no primary display".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum PetError {
    /// A window-surface primitive (move, show, hide) failed.
    #[error("Surface error: {0}")]
    Surface(String),

    /// The display-metrics provider could not report the work area.
    #[error("Display error: {0}")]
    Display(String),

    /// The todo/notification content source could not be read or watched.
    #[error("Content error: {0}")]
    Content(String),

    /// A message crossing the process boundary could not be encoded or decoded,
    /// or its channel was closed.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for desktop pet operations.
pub type Result<T> = std::result::Result<T, PetError>;
