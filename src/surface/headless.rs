//! In-memory surface and display implementations.
//!
//! [`HeadlessSurface`] records every primitive it receives instead of touching a
//! real window, and [`FixedDisplay`] reports a configured work area. The
//! headless runtime uses them to drive the full interaction loop without a
//! windowing system, and tests use the shared recorders to assert on exactly
//! which primitives the authority issued.

use crate::domain::error::{PetError, Result};
use crate::domain::{ScreenMetrics, WindowPosition};
use crate::surface::backend::{DisplayProvider, WindowSurface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One primitive received by a [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    SetBounds {
        position: WindowPosition,
        width: i32,
        height: i32,
    },
    Show,
    Hide,
    AlwaysOnTop(bool),
    SkipTaskbar(bool),
}

/// Cloneable handle onto a headless surface's call log.
///
/// Stays valid after the surface itself has been moved into the authority.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRecorder {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
    failing: Arc<AtomicBool>,
}

impl SurfaceRecorder {
    /// Snapshot of every call recorded so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Positions passed to `set_bounds`, oldest first.
    #[must_use]
    pub fn moves(&self) -> Vec<WindowPosition> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::SetBounds { position, .. } => Some(position),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls equal to `call`.
    #[must_use]
    pub fn count(&self, call: SurfaceCall) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    /// Makes every subsequent primitive fail, simulating a lost window.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, call: SurfaceCall) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PetError::Surface(format!("surface unavailable for {call:?}")));
        }
        let mut calls = self
            .calls
            .lock()
            .map_err(|e| PetError::Surface(format!("Mutex poisoned: {e}")))?;
        calls.push(call);
        drop(calls);
        Ok(())
    }
}

/// A window surface that only records what it is asked to do.
#[derive(Debug)]
pub struct HeadlessSurface {
    /// Label used in log lines (`"sprite"`, `"bubble"`).
    name: &'static str,
    recorder: SurfaceRecorder,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            recorder: SurfaceRecorder::default(),
        }
    }

    /// Returns a handle that observes this surface's calls.
    #[must_use]
    pub fn recorder(&self) -> SurfaceRecorder {
        self.recorder.clone()
    }
}

impl WindowSurface for HeadlessSurface {
    fn set_bounds(&mut self, position: WindowPosition, width: i32, height: i32) -> Result<()> {
        tracing::trace!(surface = self.name, x = position.x, y = position.y, width, height, "set bounds");
        self.recorder.record(SurfaceCall::SetBounds {
            position,
            width,
            height,
        })
    }

    fn show(&mut self) -> Result<()> {
        tracing::trace!(surface = self.name, "show");
        self.recorder.record(SurfaceCall::Show)
    }

    fn hide(&mut self) -> Result<()> {
        tracing::trace!(surface = self.name, "hide");
        self.recorder.record(SurfaceCall::Hide)
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<()> {
        self.recorder.record(SurfaceCall::AlwaysOnTop(on_top))
    }

    fn set_skip_taskbar(&mut self, skip: bool) -> Result<()> {
        self.recorder.record(SurfaceCall::SkipTaskbar(skip))
    }
}

/// Display provider reporting a fixed, externally adjustable work area.
///
/// Cloning shares the underlying value, so a test can keep one clone and
/// change or break the metrics the authority sees.
#[derive(Debug, Clone)]
pub struct FixedDisplay {
    metrics: Arc<Mutex<Option<ScreenMetrics>>>,
}

impl FixedDisplay {
    #[must_use]
    pub fn new(metrics: ScreenMetrics) -> Self {
        Self {
            metrics: Arc::new(Mutex::new(Some(metrics))),
        }
    }

    /// A display whose geometry query always fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the reported metrics; `None` makes queries fail.
    pub fn set(&self, metrics: Option<ScreenMetrics>) {
        if let Ok(mut current) = self.metrics.lock() {
            *current = metrics;
        }
    }
}

impl DisplayProvider for FixedDisplay {
    fn work_area(&self) -> Result<ScreenMetrics> {
        let current = self
            .metrics
            .lock()
            .map_err(|e| PetError::Display(format!("Mutex poisoned: {e}")))?;
        (*current).ok_or_else(|| PetError::Display("no primary display".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_sees_calls_after_surface_is_moved() {
        let surface = HeadlessSurface::new("sprite");
        let recorder = surface.recorder();
        let mut boxed: Box<dyn WindowSurface> = Box::new(surface);

        boxed.set_bounds(WindowPosition::new(5, 6), 50, 50).unwrap();
        boxed.show().unwrap();

        assert_eq!(recorder.moves(), vec![WindowPosition::new(5, 6)]);
        assert_eq!(recorder.count(SurfaceCall::Show), 1);
    }

    #[test]
    fn failing_surface_records_nothing() {
        let mut surface = HeadlessSurface::new("sprite");
        let recorder = surface.recorder();
        recorder.set_failing(true);

        assert!(surface.set_bounds(WindowPosition::new(1, 1), 50, 50).is_err());
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn display_can_become_unavailable() {
        let display = FixedDisplay::new(ScreenMetrics::new(800, 600));
        assert_eq!(display.work_area().unwrap(), ScreenMetrics::new(800, 600));

        display.set(None);
        assert!(display.work_area().is_err());
    }
}
