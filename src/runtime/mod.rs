//! Threads of control and the plumbing between them.
//!
//! ```text
//! ┌──────────────────────────┐         JSON          ┌──────────────────────────┐
//! │ presentation (main)      │ ───── requests ─────▶ │ authority thread         │
//! │  Driver → handle_event   │ ◀── reply + pushes ── │  Authority               │
//! │  TimerQueue              │                       │   ▲ content notifications│
//! └──────────────────────────┘                       └───┴──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `driver`: Event queue, action execution, timer firing
//! - `script`: JSON-lines scripted input for the headless binary
//! - `thread`: Authority thread and channel transport
//! - `timers`: Deadline-ordered timer queue
//! - `transport`: Transport trait and in-process transport

pub mod driver;
pub mod script;
pub mod thread;
pub mod timers;
pub mod transport;

pub use driver::Driver;
pub use script::{ScriptLine, ScriptedInput};
pub use thread::{AuthorityInput, AuthorityThread, ChannelTransport};
pub use timers::TimerQueue;
pub use transport::{InProcessTransport, Transport};
