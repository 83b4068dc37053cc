//! Presentation-side event loop plumbing.
//!
//! The [`Driver`] feeds events through [`handle_event`], carries out the
//! resulting actions, and turns everything the authority sends back into
//! further events. Requests are executed synchronously in the order the
//! handler emitted them, and the reply plus its pushes are processed before
//! the next queued event, so the local caches never run ahead of a write the
//! authority has not seen.
//!
//! Time is supplied by the caller. The headless binary passes the wall clock;
//! tests step through timers in virtual time with [`Driver::fire_next`].

use crate::app::{handle_event, initialize, Action, AppState, Event, Timer};
use crate::authority::AuthorityMessage;
use crate::domain::error::Result;
use crate::runtime::timers::TimerQueue;
use crate::runtime::transport::Transport;
use std::collections::VecDeque;
use std::time::Instant;

/// Owns the presentation state, the transport, and pending timers.
#[derive(Debug)]
pub struct Driver<T: Transport> {
    state: AppState,
    transport: T,
    timers: TimerQueue,
}

impl<T: Transport> Driver<T> {
    #[must_use]
    pub fn new(state: AppState, transport: T) -> Self {
        Self {
            state,
            transport,
            timers: TimerQueue::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Pending timers, for diagnostics and tests.
    #[must_use]
    pub const fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Absorbs startup pushes and sends the startup requests.
    ///
    /// Returns whether the view changed.
    ///
    /// # Errors
    ///
    /// Propagates event handler errors.
    pub fn start(&mut self, now: Instant) -> Result<bool> {
        let _span = tracing::debug_span!("driver_start").entered();
        let mut queue = self.polled_events();
        let mut render = self.drain(&mut queue, now)?;

        for action in initialize() {
            self.execute(action, now, &mut queue);
        }
        render |= self.drain(&mut queue, now)?;
        Ok(render)
    }

    /// Processes one event and everything it causes.
    ///
    /// # Errors
    ///
    /// Propagates event handler errors.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> Result<bool> {
        let mut queue = VecDeque::from([event]);
        self.drain(&mut queue, now)
    }

    /// Processes pushes that arrived outside of any request.
    ///
    /// # Errors
    ///
    /// Propagates event handler errors.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        let mut queue = self.polled_events();
        self.drain(&mut queue, now)
    }

    /// Fires every timer due at `now`, including ones scheduled by timers
    /// fired in this call.
    ///
    /// # Errors
    ///
    /// Propagates event handler errors.
    pub fn fire_due(&mut self, now: Instant) -> Result<bool> {
        let mut render = false;
        while let Some((due, timer)) = self.timers.pop_due(now) {
            render |= self.fire(due, timer)?;
        }
        Ok(render)
    }

    /// Fires the earliest pending timer at its own deadline, whatever the
    /// current time. Returns the timer, or `None` if nothing is pending.
    ///
    /// # Errors
    ///
    /// Propagates event handler errors.
    pub fn fire_next(&mut self) -> Result<Option<Timer>> {
        let Some((due, timer)) = self.timers.pop_next() else {
            return Ok(None);
        };
        self.fire(due, timer)?;
        Ok(Some(timer))
    }

    fn fire(&mut self, due: Instant, timer: Timer) -> Result<bool> {
        self.dispatch(Event::Timer { timer, at: due }, due)
    }

    fn drain(&mut self, queue: &mut VecDeque<Event>, now: Instant) -> Result<bool> {
        let mut render = false;
        while let Some(event) = queue.pop_front() {
            let (should_render, actions) = handle_event(&mut self.state, &event)?;
            render |= should_render;

            // Replies to these actions must be handled before later events.
            let mut follow_ups = VecDeque::new();
            for action in actions {
                self.execute(action, now, &mut follow_ups);
            }
            follow_ups.append(queue);
            *queue = follow_ups;
        }
        Ok(render)
    }

    fn execute(&mut self, action: Action, now: Instant, queue: &mut VecDeque<Event>) {
        match action {
            Action::Send(request) => {
                let name = request.name();
                match self.transport.call(request) {
                    Ok(messages) => queue.extend(messages.into_iter().map(message_to_event)),
                    Err(e) => tracing::warn!(request = name, error = %e, "authority call failed"),
                }
            }
            Action::RequestFrame { generation } => {
                let due = now + self.state.tuning.frame_interval();
                self.timers.schedule(due, Timer::FallTick(generation));
            }
            Action::Schedule { after, timer } => {
                self.timers.schedule(now + after, timer);
            }
        }
    }

    fn polled_events(&mut self) -> VecDeque<Event> {
        self.transport
            .poll()
            .into_iter()
            .map(message_to_event)
            .collect()
    }
}

fn message_to_event(message: AuthorityMessage) -> Event {
    match message {
        AuthorityMessage::Reply { response } => Event::Reply(response),
        AuthorityMessage::Push { push } => Event::Push(push),
    }
}
