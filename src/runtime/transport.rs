//! How the presentation side reaches the authority.
//!
//! Calls are strictly request/response. A call returns every message the
//! authority produced up to and including the reply, in order, so pushes that
//! were emitted before the reply are never reordered behind it.

use crate::authority::{Authority, AuthorityMessage, AuthorityPush, AuthorityRequest};
use crate::domain::error::Result;

/// A connection to the authority.
pub trait Transport {
    /// Sends `request` and waits for its reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the authority is unreachable or does not reply.
    fn call(&mut self, request: AuthorityRequest) -> Result<Vec<AuthorityMessage>>;

    /// Returns pushes that arrived outside of any call, without blocking.
    fn poll(&mut self) -> Vec<AuthorityMessage>;
}

/// Transport that owns the authority and calls it directly.
///
/// Used by tests and by embedders that run both sides on one thread.
#[derive(Debug)]
pub struct InProcessTransport {
    authority: Authority,
    pending: Vec<AuthorityMessage>,
}

impl InProcessTransport {
    #[must_use]
    pub const fn new(authority: Authority) -> Self {
        Self {
            authority,
            pending: Vec::new(),
        }
    }

    /// Starts the authority, queueing its startup pushes for the next poll.
    pub fn start(&mut self) {
        let pushes = self.authority.start();
        self.queue(pushes);
    }

    /// Signals that the content source changed on disk.
    pub fn content_changed(&mut self) {
        let pushes = self.authority.content_changed();
        self.queue(pushes);
    }

    #[must_use]
    pub const fn authority(&self) -> &Authority {
        &self.authority
    }

    fn queue(&mut self, pushes: Vec<AuthorityPush>) {
        self.pending
            .extend(pushes.into_iter().map(|push| AuthorityMessage::Push { push }));
    }
}

impl Transport for InProcessTransport {
    fn call(&mut self, request: AuthorityRequest) -> Result<Vec<AuthorityMessage>> {
        let (response, pushes) = self.authority.handle_request(request);
        let mut messages = std::mem::take(&mut self.pending);
        messages.push(AuthorityMessage::Reply { response });
        messages.extend(pushes.into_iter().map(|push| AuthorityMessage::Push { push }));
        Ok(messages)
    }

    fn poll(&mut self) -> Vec<AuthorityMessage> {
        std::mem::take(&mut self.pending)
    }
}
