//! Wire protocol between the presentation side and the position authority.
//!
//! This module defines the request, response, and push types exchanged across
//! the process boundary. Every call is strictly request/response; the authority
//! additionally pushes confirmed state changes so the presentation side can
//! keep a local cache instead of polling. It also implements distributed
//! tracing context propagation across the boundary.

use crate::authority::bubble::BubbleState;
use crate::content::ContentSnapshot;
use crate::domain::{ScreenMetrics, WindowPosition};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-boundary span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing requests to the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across the boundary.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled,
    /// which is always the case when tracing has not been initialized.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            Some(Self {
                trace_id: format!("{:032x}", span_context.trace_id()),
                parent_span_id: format!("{:016x}", span_context.span_id()),
            })
        } else {
            None
        }
    }
}

/// Macro to generate builder methods for `AuthorityRequest` variants.
///
/// Generates convenience constructors that automatically attach the current
/// trace context to each request variant.
macro_rules! authority_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl AuthorityRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

authority_request_builders! {
    get_position(GetPosition {}),
    set_position(SetPosition { x: f64, y: f64 }),
    get_screen_metrics(GetScreenMetrics {}),
    get_content(GetContent {}),
    show_bubble(ShowBubble { x: i32, y: i32 }),
    hide_bubble(HideBubble {}),
    pin_bubble(PinBubble { pinned: bool }),
    update_bubble_position(UpdateBubblePosition { x: i32, y: i32 }),
}

/// Requests sent from the presentation side to the authority.
///
/// All variants include an optional trace context for distributed tracing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuthorityRequest {
    /// Read the sprite's current top-left coordinate.
    GetPosition {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Move the sprite. Coordinates are rounded to whole pixels by the authority.
    SetPosition {
        x: f64,
        y: f64,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Read the primary display's work area.
    GetScreenMetrics {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Read the current bubble content.
    GetContent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Show the bubble next to a sprite anchored at `(x, y)`.
    ShowBubble {
        x: i32,
        y: i32,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Hide the bubble unless it is pinned.
    HideBubble {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Pin or unpin the bubble.
    PinBubble {
        pinned: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Re-derive the bubble placement for a sprite now anchored at `(x, y)`.
    UpdateBubblePosition {
        x: i32,
        y: i32,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl AuthorityRequest {
    /// The trace context attached to this request, if any.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::GetPosition { trace_context }
            | Self::SetPosition { trace_context, .. }
            | Self::GetScreenMetrics { trace_context }
            | Self::GetContent { trace_context }
            | Self::ShowBubble { trace_context, .. }
            | Self::HideBubble { trace_context }
            | Self::PinBubble { trace_context, .. }
            | Self::UpdateBubblePosition { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short name used for span and log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetPosition { .. } => "getPosition",
            Self::SetPosition { .. } => "setPosition",
            Self::GetScreenMetrics { .. } => "getScreenMetrics",
            Self::GetContent { .. } => "getContent",
            Self::ShowBubble { .. } => "showBubble",
            Self::HideBubble { .. } => "hideBubble",
            Self::PinBubble { .. } => "pinBubble",
            Self::UpdateBubblePosition { .. } => "updateBubblePosition",
        }
    }
}

/// Direct responses to an [`AuthorityRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityResponse {
    /// Answer to `GetPosition`.
    Position { position: WindowPosition },

    /// Answer to `SetPosition`; `ok` is false if the surface rejected the move.
    Ack { ok: bool },

    /// Answer to `GetScreenMetrics`; zero-sized if the display query failed.
    Metrics { metrics: ScreenMetrics },

    /// Answer to `GetContent`.
    Content { snapshot: ContentSnapshot },

    /// Answer to the bubble requests, which carry no payload back.
    Done,
}

/// State changes the authority announces without being asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityPush {
    /// The sprite surface was confirmed at a new position.
    PositionChanged { position: WindowPosition },

    /// The display work area differs from the last one reported.
    MetricsChanged { metrics: ScreenMetrics },

    /// Bubble visibility, pin state, or placement changed.
    BubbleChanged { state: BubbleState },

    /// The todo/notification content changed.
    ContentUpdated { snapshot: ContentSnapshot },
}

/// Envelope for everything travelling from the authority to the presentation side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityMessage {
    Reply { response: AuthorityResponse },
    Push { push: AuthorityPush },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_omit_trace_context_without_tracing() {
        let request = AuthorityRequest::set_position(10.0, 20.0);
        assert!(request.trace_context().is_none());

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("trace_context"));
    }

    #[test]
    fn requests_decode_without_trace_context() {
        let request: AuthorityRequest =
            serde_json::from_str(r#"{"PinBubble":{"pinned":true}}"#).unwrap();
        assert_eq!(request, AuthorityRequest::PinBubble { pinned: true, trace_context: None });
        assert_eq!(request.name(), "pinBubble");
    }
}
