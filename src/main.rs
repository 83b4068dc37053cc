//! Headless runtime and entry point.
//!
//! Runs the full pet without a windowing system: the authority owns recording
//! surfaces on its own thread, pointer and keyboard input arrive as JSON lines
//! on stdin, and every visible change is printed as one status line.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   stdin reader thread   │  ScriptLine → Event
//! └─────────────────────────┘
//!             │ mpsc
//!             ▼
//! ┌─────────────────────────┐        ┌─────────────────────────┐
//! │   main thread           │  JSON  │  authority thread       │
//! │   Driver + TimerQueue   │ ─────▶ │  Authority              │
//! │   status line renderer  │ ◀───── │  ▲ ContentWatcher       │
//! └─────────────────────────┘        └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```text
//! ping-pet [config.toml] [key=value ...]
//! ```
//!
//! The process exits once stdin is closed and no timers remain, so a scripted
//! drag ends after its fall has landed and settled.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use ping_pet::authority::{Authority, AuthorityParts};
use ping_pet::content::ContentWatcher;
use ping_pet::domain::ScreenMetrics;
use ping_pet::runtime::{AuthorityThread, ChannelTransport, Driver, ScriptLine};
use ping_pet::surface::{FixedDisplay, HeadlessSurface};
use ping_pet::{Config, Event, PetError, Result};

/// Longest wait for input when no timer is pending, so content pushes are
/// picked up promptly.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Work area reported when none is configured.
const DEFAULT_SCREEN: ScreenMetrics = ScreenMetrics::new(1920, 1080);

fn main() -> ExitCode {
    let config = match load_config(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ping-pet: {e}");
            return ExitCode::FAILURE;
        }
    };
    ping_pet::observability::init_tracing(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "ping-pet stopped");
            ExitCode::FAILURE
        }
    }
}

/// Builds the configuration from a TOML path and `key=value` arguments.
fn load_config(args: impl Iterator<Item = String>) -> Result<Config> {
    let mut file = None;
    let mut overrides = BTreeMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            overrides.insert(key.trim().to_string(), value.to_string());
        } else if file.is_none() {
            file = Some(PathBuf::from(arg));
        } else {
            return Err(PetError::Config(format!("unexpected argument {arg:?}")));
        }
    }

    let base = match file {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    Ok(base.from_map(&overrides))
}

fn run(config: &Config) -> Result<()> {
    let span = tracing::debug_span!("runtime_load");
    let guard = span.entered();

    let screen = config.screen_override.unwrap_or(DEFAULT_SCREEN);
    tracing::debug!(
        width = screen.width,
        height = screen.height,
        todo_path = %config.todo_path.display(),
        "starting headless runtime"
    );

    let authority = Authority::new(AuthorityParts {
        sprite: Box::new(HeadlessSurface::new("sprite")),
        bubble: Box::new(HeadlessSurface::new("bubble")),
        display: Box::new(FixedDisplay::new(screen)),
        todo_path: config.todo_path.clone(),
        tuning: config.tuning.clone(),
    });
    let authority_thread = AuthorityThread::spawn(authority)?;

    let _watcher = ContentWatcher::new(&config.todo_path, authority_thread.content_notifier())
        .map_err(|e| tracing::warn!(error = %e, "content watching disabled"))
        .ok();

    let mut driver = Driver::new(ping_pet::initialize(config), ChannelTransport::new(authority_thread));
    driver.start(Instant::now())?;
    ping_pet::ui::render(driver.state());

    let input = spawn_input_reader()?;
    drop(guard);

    event_loop(&mut driver, input)
}

fn event_loop(driver: &mut Driver<ChannelTransport>, input: Receiver<Event>) -> Result<()> {
    let mut input = Some(input);

    loop {
        let now = Instant::now();
        let wait = driver
            .next_deadline()
            .map_or(IDLE_POLL, |due| due.saturating_duration_since(now).min(IDLE_POLL));

        let mut render = false;
        match input.as_ref() {
            Some(rx) => match rx.recv_timeout(wait) {
                Ok(event) => render |= dispatch(driver, event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input closed");
                    input = None;
                }
            },
            None => thread::sleep(wait),
        }

        render |= driver.fire_due(Instant::now())?;
        render |= driver.poll(Instant::now())?;

        if render {
            ping_pet::ui::render(driver.state());
        }
        if input.is_none() && driver.timers().is_empty() {
            return Ok(());
        }
    }
}

fn dispatch(driver: &mut Driver<ChannelTransport>, event: Event) -> bool {
    let span = tracing::debug_span!("runtime_event", event = ?event);
    let _guard = span.entered();

    match driver.dispatch(event, Instant::now()) {
        Ok(render) => render,
        Err(e) => {
            tracing::warn!(error = %e, "error handling event");
            false
        }
    }
}

/// Reads script lines from stdin on a separate thread, honoring each line's
/// delay before delivering its event. Bad lines are logged and skipped.
fn spawn_input_reader() -> Result<Receiver<Event>> {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("ping-pet-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let script = match ScriptLine::parse(&line) {
                    Ok(script) => script,
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping script line");
                        continue;
                    }
                };
                thread::sleep(script.delay());
                if tx.send(script.input.into_event(Instant::now())).is_err() {
                    break;
                }
            }
        })?;

    Ok(rx)
}
