//! Structured logging and file-based span export.
//!
//! ```text
//! tracing macros ─┬─▶ fmt layer ─────────────▶ stderr
//!                 └─▶ OpenTelemetryLayer ─▶ FileSpanExporter ─▶ ping-pet-otlp.json
//! ```
//!
//! Spans are written as OTLP JSON, one batch per line, to
//! `ping-pet-otlp.json` in the platform data directory
//! (`~/.local/share/ping-pet` on Linux). The file rotates at 10 MB
//! and keeps three numbered backups.
//!
//! Requests crossing from the presentation to the authority carry a
//! [`TraceContext`](crate::authority::TraceContext), so authority-side spans
//! nest under the presentation span that issued the request.
//!
//! # Level
//!
//! 1. `RUST_LOG`
//! 2. `trace_level` configuration key
//! 3. `"info"`

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE};
pub use tracer::create_tracer_provider;
