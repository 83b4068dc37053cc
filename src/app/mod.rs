//! Presentation side: pointer interpretation, physics, and sprite state.
//!
//! This layer sits between the runtime and the authority. It never touches a
//! window directly; it turns events into requests for the authority and
//! timers for the runtime.
//!
//! # Architecture
//!
//! ```text
//! Pointer / Timers → Events → handle_event → State Mutations → Actions
//!                                  ↑                              ↓
//!                                  └──── Authority replies/pushes ┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`drag`]: Click versus drag classification and drag offset
//! - [`handler`]: Event processing and state transitions
//! - [`hover`]: Combined sprite/bubble hover region with grace tokens
//! - [`modes`]: Sprite visual state machine
//! - [`physics`]: Fall simulation
//! - [`session`]: Exclusive position ownership and generation tokens
//! - [`state`]: Presentation state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use ping_pet::app::{handle_event, AppState, Event};
//! use ping_pet::domain::Tuning;
//!
//! let mut state = AppState::new(Tuning::default());
//! let (render, actions) = handle_event(&mut state, &Event::SpriteEnter)?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), ping_pet::PetError>(())
//! ```

pub mod actions;
pub mod drag;
pub mod handler;
pub mod hover;
pub mod modes;
pub mod physics;
pub mod session;
pub mod state;

pub use actions::{Action, Timer};
pub use drag::{DragPhase, DragSession};
pub use handler::{handle_event, initialize, Event};
pub use hover::HoverRegion;
pub use modes::{SpriteMode, SpriteState};
pub use physics::{FallSession, FallStep};
pub use session::{ActiveSession, Generation, GenerationCounter};
pub use state::AppState;
