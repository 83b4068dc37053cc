//! Request handling on the authority side of the process boundary.
//!
//! The [`Authority`] owns the position authority, the bubble controller and the
//! content source. It answers each request synchronously and never calls back
//! into the presentation side; confirmed state changes are returned as pushes
//! for the transport to deliver after the reply. Trace context carried by a
//! request is attached as the remote parent of the handling span.

use crate::authority::bubble::BubbleController;
use crate::authority::messages::{AuthorityPush, AuthorityRequest, AuthorityResponse};
use crate::authority::position::{MoveOutcome, PositionAuthority};
use crate::content::ContentSource;
use crate::domain::{ScreenMetrics, Tuning, WindowPosition};
use crate::surface::{DisplayProvider, WindowSurface};
use std::path::PathBuf;

/// Everything the authority needs, injected once at startup.
pub struct AuthorityParts {
    pub sprite: Box<dyn WindowSurface>,
    pub bubble: Box<dyn WindowSurface>,
    pub display: Box<dyn DisplayProvider>,
    pub todo_path: PathBuf,
    pub tuning: Tuning,
}

/// Position authority, bubble controller and content source behind one
/// request/response entry point.
#[derive(Debug)]
pub struct Authority {
    position: PositionAuthority,
    bubble: BubbleController,
    content: ContentSource,
    tuning: Tuning,
    /// Metrics last announced to the presentation side.
    last_metrics: Option<ScreenMetrics>,
}

impl Authority {
    #[must_use]
    pub fn new(parts: AuthorityParts) -> Self {
        let AuthorityParts {
            sprite,
            bubble,
            display,
            todo_path,
            tuning,
        } = parts;

        Self {
            position: PositionAuthority::new(sprite, display, tuning.sprite_size),
            bubble: BubbleController::new(bubble, tuning.bubble),
            content: ContentSource::new(todo_path),
            tuning,
            last_metrics: None,
        }
    }

    /// Places the sprite at its spawn point and loads the initial content.
    ///
    /// Returns the pushes announcing the resulting state.
    pub fn start(&mut self) -> Vec<AuthorityPush> {
        let _span = tracing::debug_span!("authority_start").entered();

        let mut pushes = Vec::new();
        self.push_metrics_if_changed(&mut pushes);

        if let MoveOutcome::Moved(position) = self.position.place_at_spawn(&self.tuning) {
            pushes.push(AuthorityPush::PositionChanged { position });
        }

        let snapshot = self.content.read();
        pushes.push(AuthorityPush::ContentUpdated { snapshot });
        pushes
    }

    #[must_use]
    pub const fn position(&self) -> WindowPosition {
        self.position.position()
    }

    /// Re-reads the content source after an external change notification.
    pub fn content_changed(&mut self) -> Vec<AuthorityPush> {
        let _span = tracing::debug_span!("authority_content_changed").entered();
        self.content
            .refresh()
            .map(|snapshot| AuthorityPush::ContentUpdated { snapshot })
            .into_iter()
            .collect()
    }

    /// Attaches the parent trace context from a request to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the
    /// request so spans created here link to the presentation side's span.
    fn attach_parent_trace_context(request: &AuthorityRequest) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = request.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes one request, returning the reply and any pushes it caused.
    ///
    /// Pushes must be delivered after the reply.
    pub fn handle_request(&mut self, request: AuthorityRequest) -> (AuthorityResponse, Vec<AuthorityPush>) {
        let _context_guard = Self::attach_parent_trace_context(&request);

        let span = tracing::debug_span!("authority_handle_request", request = request.name());
        let _guard = span.entered();

        let mut pushes = Vec::new();

        let response = match request {
            AuthorityRequest::GetPosition { .. } => AuthorityResponse::Position {
                position: self.position.position(),
            },

            AuthorityRequest::SetPosition { x, y, .. } => {
                let outcome = self.position.set_position(x, y);
                if let MoveOutcome::Moved(position) = outcome {
                    pushes.push(AuthorityPush::PositionChanged { position });
                }
                AuthorityResponse::Ack { ok: outcome.is_ok() }
            }

            AuthorityRequest::GetScreenMetrics { .. } => {
                let metrics = self.push_metrics_if_changed(&mut pushes);
                AuthorityResponse::Metrics { metrics }
            }

            AuthorityRequest::GetContent { .. } => AuthorityResponse::Content {
                snapshot: self.content.read(),
            },

            AuthorityRequest::ShowBubble { x, y, .. } => {
                let metrics = self.position.screen_metrics();
                if self.bubble.show_at(WindowPosition::new(x, y), &metrics) {
                    self.push_bubble(&mut pushes);
                }
                if let Some(snapshot) = self.content.refresh() {
                    pushes.push(AuthorityPush::ContentUpdated { snapshot });
                }
                AuthorityResponse::Done
            }

            AuthorityRequest::HideBubble { .. } => {
                if self.bubble.hide() {
                    self.push_bubble(&mut pushes);
                }
                AuthorityResponse::Done
            }

            AuthorityRequest::PinBubble { pinned, .. } => {
                let metrics = self.position.screen_metrics();
                if self.bubble.set_pinned(pinned, self.position.position(), &metrics) {
                    self.push_bubble(&mut pushes);
                }
                AuthorityResponse::Done
            }

            AuthorityRequest::UpdateBubblePosition { x, y, .. } => {
                let metrics = self.position.screen_metrics();
                if self.bubble.reposition(WindowPosition::new(x, y), &metrics) {
                    self.push_bubble(&mut pushes);
                }
                AuthorityResponse::Done
            }
        };

        tracing::trace!(?response, push_count = pushes.len(), "request handled");
        (response, pushes)
    }

    fn push_bubble(&self, pushes: &mut Vec<AuthorityPush>) {
        pushes.push(AuthorityPush::BubbleChanged {
            state: self.bubble.state(),
        });
    }

    fn push_metrics_if_changed(&mut self, pushes: &mut Vec<AuthorityPush>) -> ScreenMetrics {
        let metrics = self.position.screen_metrics();
        if self.last_metrics != Some(metrics) {
            self.last_metrics = Some(metrics);
            pushes.push(AuthorityPush::MetricsChanged { metrics });
        }
        metrics
    }
}
