//! The position authority: owner of the sprite and bubble surfaces.
//!
//! Runs on its own thread of control and serializes every read and move of
//! window state. The presentation side talks to it only through the message
//! types in [`messages`].
//!
//! # Modules
//!
//! - `messages`: Request, response and push types with trace propagation
//! - `position`: Sprite coordinates and display metrics
//! - `bubble`: Bubble placement, visibility and pin state
//! - `handler`: Request dispatch

pub mod bubble;
pub mod handler;
pub mod messages;
pub mod position;

pub use bubble::{BubbleController, BubbleState};
pub use handler::{Authority, AuthorityParts};
pub use messages::{AuthorityMessage, AuthorityPush, AuthorityRequest, AuthorityResponse, TraceContext};
pub use position::{MoveOutcome, PositionAuthority};
