//! Event handling and state transition logic for the presentation side.
//!
//! [`handle_event`] is the single entry point: pointer input, keyboard input,
//! timer expirations and everything arriving from the authority are all
//! events. Each call mutates [`AppState`] and returns the actions the runtime
//! must carry out, plus whether the view changed.
//!
//! # Event Types
//!
//! - **Pointer**: `PointerDown`, `PointerMove`, `PointerUp` on the sprite
//! - **Hover**: `SpriteEnter`, `SpriteLeave`, `BubbleEnter`, `BubbleLeave`
//! - **Keyboard**: `Escape`
//! - **Timers**: fall ticks, settle, hold, hover grace
//! - **Authority**: replies and pushes
//!
//! Deferred continuations are checked against the active session's
//! generation before they act. A tick from a cancelled fall is dropped here
//! and never reaches the authority.

use crate::app::drag::{DragPhase, DragSession};
use crate::app::modes::SpriteMode;
use crate::app::physics::{FallSession, FallStep};
use crate::app::session::{ActiveSession, Generation};
use crate::app::{Action, AppState, Timer};
use crate::authority::{AuthorityPush, AuthorityRequest, AuthorityResponse};
use crate::domain::error::Result;
use crate::domain::{Point, WindowPosition};
use std::time::Instant;

/// Events delivered to the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Primary button pressed on the sprite, in screen coordinates.
    PointerDown { x: f64, y: f64, at: Instant },
    PointerMove { x: f64, y: f64, at: Instant },
    PointerUp { x: f64, y: f64, at: Instant },

    SpriteEnter,
    SpriteLeave,
    BubbleEnter,
    BubbleLeave,

    /// Cancels a pinned bubble.
    Escape,

    /// A scheduled timer or frame fired.
    Timer { timer: Timer, at: Instant },

    /// Direct answer to a request this side sent.
    Reply(AuthorityResponse),

    /// Unsolicited state change announced by the authority.
    Push(AuthorityPush),
}

/// Requests the presentation side sends once at startup.
///
/// After these the local caches are kept current by pushes alone.
#[must_use]
pub fn initialize() -> Vec<Action> {
    vec![
        Action::Send(AuthorityRequest::get_screen_metrics()),
        Action::Send(AuthorityRequest::get_position()),
        Action::Send(AuthorityRequest::get_content()),
    ]
}

/// Processes an event, mutates presentation state, and returns actions to
/// execute in order.
///
/// The boolean is `true` if the rendered view changed.
///
/// # Errors
///
/// Currently infallible; the signature leaves room for handlers that reject
/// malformed input.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let before = state.compute_viewmodel();
    let mut actions = Vec::new();

    match event {
        Event::PointerDown { x, y, at } => pointer_down(state, Point::new(*x, *y), *at, &mut actions),
        Event::PointerMove { x, y, at } => pointer_move(state, Point::new(*x, *y), *at, &mut actions),
        Event::PointerUp { .. } => pointer_up(state, &mut actions),

        Event::SpriteEnter => {
            state.sprite.hovering = true;
            let arrived = state.hover.enter_sprite();
            if arrived && matches!(state.session, ActiveSession::None) && !state.bubble.visible {
                let anchor = state.position;
                state.bubble.visible = true;
                actions.push(Action::Send(AuthorityRequest::show_bubble(anchor.x, anchor.y)));
            }
        }
        Event::SpriteLeave => {
            state.sprite.hovering = false;
            let token = state.hover.leave_sprite();
            schedule_grace(state, token, &mut actions);
        }
        Event::BubbleEnter => {
            state.hover.enter_bubble();
        }
        Event::BubbleLeave => {
            let token = state.hover.leave_bubble();
            schedule_grace(state, token, &mut actions);
        }

        Event::Escape => {
            if state.bubble.pinned {
                tracing::debug!("escape unpins bubble");
                unpin(state, &mut actions);
            }
        }

        Event::Timer { timer, at } => match *timer {
            Timer::FallTick(generation) => fall_tick(state, generation, &mut actions),
            Timer::Settle(generation) => settle(state, generation, &mut actions),
            Timer::Hold(generation) => hold(state, generation, *at),
            Timer::HoverGrace(token) => {
                if state.hover.grace_expired(token) && state.bubble.visible && !state.bubble.pinned {
                    tracing::debug!(token, "hover grace expired, hiding bubble");
                    state.bubble.visible = false;
                    actions.push(Action::Send(AuthorityRequest::hide_bubble()));
                }
            }
        },

        Event::Reply(response) => apply_reply(state, response, &mut actions),
        Event::Push(push) => apply_push(state, push),
    }

    let should_render = state.compute_viewmodel() != before;
    Ok((should_render, actions))
}

fn pointer_down(state: &mut AppState, pointer: Point, at: Instant, actions: &mut Vec<Action>) {
    match &state.session {
        ActiveSession::Drag(_) => {
            tracing::debug!("pointer down during drag ignored");
            return;
        }
        ActiveSession::Falling(_) | ActiveSession::Settling { .. } => {
            tracing::debug!(session = state.session.name(), "fall cancelled by new press");
        }
        ActiveSession::None => {}
    }

    let generation = state.generations.bump();
    state.session = ActiveSession::Drag(DragSession::start(pointer, state.position, at, generation));
    state.set_mode(SpriteMode::Idle);

    actions.push(Action::Schedule {
        after: state.tuning.hold_delay(),
        timer: Timer::Hold(generation),
    });
}

fn pointer_move(state: &mut AppState, pointer: Point, at: Instant, actions: &mut Vec<Action>) {
    let resting_line = state.resting_line();
    let threshold = state.tuning.drag_threshold_px;
    let hold_delay = state.tuning.hold_delay();

    let ActiveSession::Drag(drag) = &mut state.session else {
        return;
    };

    let promoted = drag.track(pointer, threshold);
    if drag.phase() == DragPhase::Pending {
        return;
    }

    let held = drag.shows_held(at, hold_delay);
    let target = drag.target(pointer, resting_line);
    let generation = drag.generation();

    if promoted {
        tracing::debug!(%generation, "press became a drag");
        if state.bubble.visible && !state.bubble.pinned {
            state.bubble.visible = false;
            actions.push(Action::Send(AuthorityRequest::hide_bubble()));
        }
    }

    if held {
        state.set_mode(SpriteMode::Held);
    }

    move_sprite(state, target, actions);
}

fn pointer_up(state: &mut AppState, actions: &mut Vec<Action>) {
    if !matches!(state.session, ActiveSession::Drag(_)) {
        return;
    }
    let ActiveSession::Drag(drag) = std::mem::take(&mut state.session) else {
        return;
    };

    match drag.phase() {
        DragPhase::Pending => {
            let pinned = !state.bubble.pinned;
            tracing::debug!(pinned, "click toggles bubble pin");
            if pinned {
                state.bubble.pinned = true;
                state.bubble.visible = true;
                actions.push(Action::Send(AuthorityRequest::pin_bubble(true)));
            } else {
                unpin(state, actions);
            }
            // A press that interrupted a fall leaves the sprite airborne.
            if !start_fall(state, actions) {
                state.set_mode(SpriteMode::Idle);
            }
        }
        DragPhase::Dragging => {
            if !start_fall(state, actions) {
                tracing::debug!("released on the resting line, no fall");
                state.set_mode(SpriteMode::Idle);
                reopen_if_hovered(state, actions);
            }
        }
    }
}

/// Hands the sprite to gravity if it is above the resting line.
///
/// Returns whether a fall started.
fn start_fall(state: &mut AppState, actions: &mut Vec<Action>) -> bool {
    if state.position.y >= state.resting_line() {
        return false;
    }
    let generation = state.generations.bump();
    let Some(fall) = FallSession::start(
        state.position,
        state.resting_line(),
        state.tuning.acceleration,
        generation,
    ) else {
        return false;
    };

    tracing::debug!(%generation, from_y = state.position.y, "fall started");
    state.session = ActiveSession::Falling(fall);
    state.set_mode(SpriteMode::Falling);
    actions.push(Action::RequestFrame { generation });
    true
}

/// Opens the bubble again when a gesture ends with the pointer still in the
/// hover region.
fn reopen_if_hovered(state: &mut AppState, actions: &mut Vec<Action>) {
    if matches!(state.session, ActiveSession::None) && state.hover.is_inside() && !state.bubble.visible {
        let anchor = state.position;
        tracing::debug!("pointer still hovering, reopening bubble");
        state.bubble.visible = true;
        actions.push(Action::Send(AuthorityRequest::show_bubble(anchor.x, anchor.y)));
    }
}

fn fall_tick(state: &mut AppState, generation: Generation, actions: &mut Vec<Action>) {
    let step = match &mut state.session {
        ActiveSession::Falling(fall) if fall.generation() == generation => fall.step(),
        ActiveSession::Settling { generation: settled } if *settled == generation => {
            tracing::trace!(%generation, "tick after landing ignored");
            return;
        }
        _ => {
            tracing::trace!(%generation, "stale fall tick dropped");
            return;
        }
    };

    move_sprite(state, step.position(), actions);

    match step {
        FallStep::Moved(_) => actions.push(Action::RequestFrame { generation }),
        FallStep::Landed(position) => {
            tracing::debug!(%generation, x = position.x, y = position.y, "landed");
            state.session = ActiveSession::Settling { generation };
            actions.push(Action::Schedule {
                after: state.tuning.settle_delay(),
                timer: Timer::Settle(generation),
            });
        }
    }
}

fn settle(state: &mut AppState, generation: Generation, actions: &mut Vec<Action>) {
    if matches!(state.session, ActiveSession::Settling { generation: g } if g == generation) {
        state.session = ActiveSession::None;
        state.set_mode(SpriteMode::Idle);
        reopen_if_hovered(state, actions);
    } else {
        tracing::trace!(%generation, "stale settle dropped");
    }
}

fn hold(state: &mut AppState, generation: Generation, at: Instant) {
    let hold_delay = state.tuning.hold_delay();
    if let ActiveSession::Drag(drag) = &state.session {
        if drag.generation() == generation && drag.shows_held(at, hold_delay) {
            state.set_mode(SpriteMode::Held);
        }
    }
}

/// Sends a move for the sprite and, if the bubble is pinned, drags the bubble
/// along.
fn move_sprite(state: &mut AppState, target: WindowPosition, actions: &mut Vec<Action>) {
    if target == state.position {
        return;
    }

    actions.push(Action::Send(AuthorityRequest::set_position(
        f64::from(target.x),
        f64::from(target.y),
    )));
    state.set_position(target);

    if state.bubble.pinned {
        actions.push(Action::Send(AuthorityRequest::update_bubble_position(target.x, target.y)));
    }
}

fn unpin(state: &mut AppState, actions: &mut Vec<Action>) {
    state.bubble.pinned = false;
    actions.push(Action::Send(AuthorityRequest::pin_bubble(false)));
    let token = state.hover.arm_if_outside();
    schedule_grace(state, token, actions);
}

fn schedule_grace(state: &AppState, token: Option<u64>, actions: &mut Vec<Action>) {
    if let Some(token) = token {
        actions.push(Action::Schedule {
            after: state.tuning.hover_grace(),
            timer: Timer::HoverGrace(token),
        });
    }
}

fn apply_reply(state: &mut AppState, response: &AuthorityResponse, actions: &mut Vec<Action>) {
    match response {
        AuthorityResponse::Position { position } => {
            state.set_position(*position);
        }
        AuthorityResponse::Metrics { metrics } => {
            state.metrics = *metrics;
            let position = state.position;
            state.sprite.update_direction(position, metrics);
        }
        AuthorityResponse::Content { snapshot } => {
            state.rows.clone_from(&snapshot.rows);
            state.content_read_at = Some(snapshot.read_at);
        }
        AuthorityResponse::Ack { ok: false } => {
            tracing::debug!("move rejected, resynchronizing position");
            actions.push(Action::Send(AuthorityRequest::get_position()));
        }
        AuthorityResponse::Ack { ok: true } | AuthorityResponse::Done => {}
    }
}

fn apply_push(state: &mut AppState, push: &AuthorityPush) {
    match push {
        AuthorityPush::PositionChanged { position } => {
            state.set_position(*position);
        }
        AuthorityPush::MetricsChanged { metrics } => {
            tracing::debug!(width = metrics.width, height = metrics.height, "screen metrics changed");
            state.metrics = *metrics;
            let position = state.position;
            state.sprite.update_direction(position, metrics);
        }
        AuthorityPush::BubbleChanged { state: bubble } => {
            state.bubble = *bubble;
        }
        AuthorityPush::ContentUpdated { snapshot } => {
            tracing::debug!(row_count = snapshot.rows.len(), "content updated");
            state.rows.clone_from(&snapshot.rows);
            state.content_read_at = Some(snapshot.read_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScreenMetrics, Tuning};
    use crate::ui::SpriteAsset;
    use std::time::Duration;

    fn ready_state() -> (AppState, Instant) {
        let mut state = AppState::new(Tuning::default());
        state.metrics = ScreenMetrics::new(1920, 1080);
        state.set_position(WindowPosition::new(1870, 1035));
        (state, Instant::now())
    }

    fn sends(actions: &[Action]) -> Vec<&AuthorityRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Send(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn click_toggles_pin_without_moving() {
        let (mut state, t0) = ready_state();

        let (_, down) = handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        let (_, moved) = handle_event(
            &mut state,
            &Event::PointerMove {
                x: 1892.0,
                y: 1061.0,
                at: t0 + Duration::from_millis(30),
            },
        )
        .unwrap();
        let (_, up) = handle_event(
            &mut state,
            &Event::PointerUp {
                x: 1892.0,
                y: 1061.0,
                at: t0 + Duration::from_millis(60),
            },
        )
        .unwrap();

        assert!(sends(&down).is_empty());
        assert!(sends(&moved).is_empty());
        assert_eq!(sends(&up), vec![&AuthorityRequest::PinBubble { pinned: true, trace_context: None }]);
        assert!(state.bubble.pinned);
        assert_eq!(state.session, ActiveSession::None);
    }

    #[test]
    fn drag_moves_with_fixed_offset_and_hides_bubble() {
        let (mut state, t0) = ready_state();
        state.bubble.visible = true;

        handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        let (render, actions) = handle_event(
            &mut state,
            &Event::PointerMove {
                x: 70.0,
                y: 525.0,
                at: t0 + Duration::from_millis(200),
            },
        )
        .unwrap();

        assert!(render);
        assert_eq!(
            sends(&actions),
            vec![
                &AuthorityRequest::HideBubble { trace_context: None },
                &AuthorityRequest::SetPosition {
                    x: 50.0,
                    y: 500.0,
                    trace_context: None
                },
            ]
        );
        assert_eq!(state.sprite.mode, SpriteMode::Held);
    }

    #[test]
    fn quick_drag_does_not_show_held() {
        let (mut state, t0) = ready_state();
        handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        handle_event(
            &mut state,
            &Event::PointerMove {
                x: 1800.0,
                y: 1000.0,
                at: t0 + Duration::from_millis(20),
            },
        )
        .unwrap();
        assert_eq!(state.sprite.mode, SpriteMode::Idle);
    }

    #[test]
    fn pinned_bubble_follows_drag() {
        let (mut state, t0) = ready_state();
        state.bubble.pinned = true;
        state.bubble.visible = true;

        handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        let (_, actions) = handle_event(
            &mut state,
            &Event::PointerMove {
                x: 1000.0,
                y: 800.0,
                at: t0 + Duration::from_millis(150),
            },
        )
        .unwrap();

        let requests = sends(&actions);
        assert_eq!(requests.len(), 2);
        assert!(matches!(
            requests[1],
            AuthorityRequest::UpdateBubblePosition { x: 980, y: 775, .. }
        ));
    }

    #[test]
    fn release_on_resting_line_goes_idle_without_fall() {
        let (mut state, t0) = ready_state();
        handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        handle_event(
            &mut state,
            &Event::PointerMove {
                x: 1500.0,
                y: 1300.0,
                at: t0 + Duration::from_millis(150),
            },
        )
        .unwrap();
        assert_eq!(state.position, WindowPosition::new(1480, 1035));

        let (_, actions) = handle_event(
            &mut state,
            &Event::PointerUp {
                x: 1500.0,
                y: 1300.0,
                at: t0 + Duration::from_millis(200),
            },
        )
        .unwrap();

        assert!(actions.is_empty());
        assert_eq!(state.session, ActiveSession::None);
        assert_eq!(state.sprite.mode, SpriteMode::Idle);
    }

    #[test]
    fn stale_tick_is_dropped() {
        let (mut state, t0) = ready_state();
        let stale = state.generations.bump();
        state.generations.bump();

        let (render, actions) = handle_event(
            &mut state,
            &Event::Timer {
                timer: Timer::FallTick(stale),
                at: t0,
            },
        )
        .unwrap();

        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn escape_unpins_and_arms_grace() {
        let (mut state, t0) = ready_state();
        state.bubble.pinned = true;
        state.bubble.visible = true;

        let (_, actions) = handle_event(&mut state, &Event::Escape).unwrap();
        let Some(Action::Schedule {
            timer: Timer::HoverGrace(token),
            ..
        }) = actions.last().cloned()
        else {
            panic!("expected grace timer, got {actions:?}");
        };

        let (_, hidden) = handle_event(
            &mut state,
            &Event::Timer {
                timer: Timer::HoverGrace(token),
                at: t0,
            },
        )
        .unwrap();
        assert_eq!(sends(&hidden), vec![&AuthorityRequest::HideBubble { trace_context: None }]);

        let (_, again) = handle_event(
            &mut state,
            &Event::Timer {
                timer: Timer::HoverGrace(token),
                at: t0,
            },
        )
        .unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn hover_enter_shows_bubble_at_sprite() {
        let (mut state, _) = ready_state();
        let (render, actions) = handle_event(&mut state, &Event::SpriteEnter).unwrap();

        assert!(render);
        assert!(matches!(
            sends(&actions)[..],
            [AuthorityRequest::ShowBubble { x: 1870, y: 1035, .. }]
        ));
    }

    #[test]
    fn failed_ack_requests_position() {
        let (mut state, _) = ready_state();
        let (_, actions) = handle_event(&mut state, &Event::Reply(AuthorityResponse::Ack { ok: false })).unwrap();
        assert!(matches!(sends(&actions)[..], [AuthorityRequest::GetPosition { .. }]));
    }
    fn fire(state: &mut AppState, timer: Timer, at: Instant) -> (bool, Vec<Action>) {
        handle_event(state, &Event::Timer { timer, at }).unwrap()
    }

    /// Steps the active fall until it lands, returning its generation.
    fn land(state: &mut AppState, at: Instant) -> Generation {
        let generation = state.session.generation().unwrap();
        while matches!(state.session, ActiveSession::Falling(_)) {
            fire(state, Timer::FallTick(generation), at);
        }
        assert_eq!(state.session, ActiveSession::Settling { generation });
        generation
    }

    #[test]
    fn ticks_after_landing_are_inert() {
        let (mut state, t0) = ready_state();
        state.set_position(WindowPosition::new(50, 1000));
        assert!(start_fall(&mut state, &mut Vec::new()));
        let generation = land(&mut state, t0);
        assert_eq!(state.position, WindowPosition::new(50, 1035));

        let (render, actions) = fire(&mut state, Timer::FallTick(generation), t0);
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.session, ActiveSession::Settling { generation });

        let (_, settled) = fire(&mut state, Timer::Settle(generation), t0);
        assert!(settled.is_empty());
        assert_eq!(state.session, ActiveSession::None);

        let (render, actions) = fire(&mut state, Timer::FallTick(generation), t0);
        assert!(!render);
        assert!(actions.is_empty());
        let (render, actions) = fire(&mut state, Timer::Settle(generation), t0);
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.position, WindowPosition::new(50, 1035));
    }

    #[test]
    fn release_on_line_reopens_bubble_for_hovering_pointer() {
        let (mut state, t0) = ready_state();
        handle_event(&mut state, &Event::SpriteEnter).unwrap();
        assert!(state.bubble.visible);

        handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        let (_, moved) = handle_event(
            &mut state,
            &Event::PointerMove {
                x: 1500.0,
                y: 1060.0,
                at: t0 + Duration::from_millis(150),
            },
        )
        .unwrap();
        assert!(sends(&moved).contains(&&AuthorityRequest::HideBubble { trace_context: None }));
        assert!(!state.bubble.visible);

        let (_, released) = handle_event(
            &mut state,
            &Event::PointerUp {
                x: 1500.0,
                y: 1060.0,
                at: t0 + Duration::from_millis(200),
            },
        )
        .unwrap();

        assert!(matches!(
            sends(&released).as_slice(),
            [AuthorityRequest::ShowBubble { x: 1480, y: 1035, .. }]
        ));
        assert!(state.hover.is_inside());
        assert!(state.bubble.visible);
        assert_eq!(state.compute_viewmodel().sprite.asset, SpriteAsset::Interested);
    }

    #[test]
    fn settle_reopens_bubble_for_hovering_pointer() {
        let (mut state, t0) = ready_state();
        handle_event(&mut state, &Event::SpriteEnter).unwrap();
        handle_event(&mut state, &Event::PointerDown { x: 1890.0, y: 1060.0, at: t0 }).unwrap();
        handle_event(
            &mut state,
            &Event::PointerMove {
                x: 1020.0,
                y: 825.0,
                at: t0 + Duration::from_millis(150),
            },
        )
        .unwrap();
        handle_event(
            &mut state,
            &Event::PointerUp {
                x: 1020.0,
                y: 825.0,
                at: t0 + Duration::from_millis(200),
            },
        )
        .unwrap();
        assert!(!state.bubble.visible);

        let generation = land(&mut state, t0);
        assert!(!state.bubble.visible);

        let (_, settled) = fire(&mut state, Timer::Settle(generation), t0);
        assert!(matches!(
            sends(&settled).as_slice(),
            [AuthorityRequest::ShowBubble { x: 1000, y: 1035, .. }]
        ));
        assert!(state.bubble.visible);
    }

    #[test]
    fn click_on_airborne_sprite_resumes_fall() {
        let (mut state, t0) = ready_state();
        state.set_position(WindowPosition::new(50, 506));

        handle_event(&mut state, &Event::PointerDown { x: 60.0, y: 516.0, at: t0 }).unwrap();
        let (_, released) = handle_event(
            &mut state,
            &Event::PointerUp {
                x: 60.0,
                y: 516.0,
                at: t0 + Duration::from_millis(50),
            },
        )
        .unwrap();

        assert!(state.bubble.pinned);
        assert_eq!(state.sprite.mode, SpriteMode::Falling);
        let ActiveSession::Falling(fall) = &state.session else {
            panic!("expected a fall, got {:?}", state.session);
        };
        let generation = fall.generation();
        assert!(released.contains(&Action::RequestFrame { generation }));

        land(&mut state, t0);
        assert_eq!(state.position, WindowPosition::new(50, 1035));
    }
}
