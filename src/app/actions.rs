//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event, so
//! multiple side effects are queued atomically. The runtime executes them in
//! order: requests go to the authority, frames and timers go to the scheduler.
//!
//! # Example
//!
//! ```rust
//! use ping_pet::app::{Action, Timer};
//! use ping_pet::authority::AuthorityRequest;
//! use std::time::Duration;
//!
//! let actions = vec![
//!     Action::Send(AuthorityRequest::hide_bubble()),
//!     Action::Schedule { after: Duration::from_millis(100), timer: Timer::HoverGrace(1) },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::app::hover::GraceToken;
use crate::app::session::Generation;
use crate::authority::AuthorityRequest;
use std::time::Duration;

/// Deferred continuations. Each carries the token it was scheduled under so
/// the handler can drop it if its owner is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timer {
    /// Next step of the fall simulation.
    FallTick(Generation),
    /// End of the post-landing settle delay.
    Settle(Generation),
    /// Hold delay elapsed for a drag.
    Hold(Generation),
    /// Hover grace period elapsed.
    HoverGrace(GraceToken),
}

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Sends a request across the process boundary.
    Send(AuthorityRequest),

    /// Asks for a `FallTick` on the next display refresh.
    RequestFrame { generation: Generation },

    /// Fires `timer` after `after` has elapsed.
    Schedule { after: Duration, timer: Timer },
}
