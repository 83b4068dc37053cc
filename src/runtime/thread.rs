//! The authority's own thread of control and the channel transport to it.
//!
//! Requests and replies cross the boundary as JSON strings, the same payloads
//! a process boundary would carry. Each reply travels in one batch with the
//! pushes its request caused, tagged with the id of that request. A reply
//! that arrives after its call gave up is discarded rather than handed to
//! the next caller. The authority thread never waits on the presentation
//! side, so a call can only block for one round trip.

use crate::authority::{Authority, AuthorityMessage, AuthorityPush, AuthorityRequest, AuthorityResponse};
use crate::domain::error::{PetError, Result};
use crate::runtime::transport::Transport;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Upper bound on one round trip before the call is abandoned.
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Messages into the authority thread.
#[derive(Debug)]
pub enum AuthorityInput {
    /// A JSON-encoded [`AuthorityRequest`] with the caller's sequence id.
    Request { id: u64, payload: String },
    /// The content source changed on disk.
    ContentChanged,
    Shutdown,
}

/// Serialized messages out of the authority thread.
#[derive(Debug)]
struct Batch {
    /// Id of the request answered by this batch; `None` for unsolicited pushes.
    reply_to: Option<u64>,
    messages: Vec<String>,
}

/// Handle to a running authority thread.
#[derive(Debug)]
pub struct AuthorityThread {
    sender: mpsc::Sender<AuthorityInput>,
    receiver: mpsc::Receiver<Batch>,
    handle: Option<JoinHandle<()>>,
}

impl AuthorityThread {
    /// Spawns the authority on a named thread and starts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(authority: Authority) -> Result<Self> {
        let (input_tx, input_rx) = mpsc::channel::<AuthorityInput>();
        let (output_tx, output_rx) = mpsc::channel::<Batch>();

        let handle = thread::Builder::new()
            .name("ping-pet-authority".into())
            .spawn(move || authority_loop(authority, &input_rx, &output_tx))?;

        Ok(Self {
            sender: input_tx,
            receiver: output_rx,
            handle: Some(handle),
        })
    }

    /// Returns a callback that tells the authority its content changed.
    ///
    /// Suitable for a filesystem watcher running on another thread.
    #[must_use]
    pub fn content_notifier(&self) -> impl Fn() + Send + 'static {
        let sender = self.sender.clone();
        move || {
            if sender.send(AuthorityInput::ContentChanged).is_err() {
                tracing::debug!("authority gone, dropping content notification");
            }
        }
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(AuthorityInput::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AuthorityThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn authority_loop(
    mut authority: Authority,
    input: &mpsc::Receiver<AuthorityInput>,
    output: &mpsc::Sender<Batch>,
) {
    let send = |reply_to: Option<u64>, messages: Vec<AuthorityMessage>| {
        let messages: Vec<String> = messages
            .iter()
            .filter_map(|message| {
                serde_json::to_string(message)
                    .map_err(|e| tracing::warn!(error = %e, "failed to serialize authority message"))
                    .ok()
            })
            .collect();
        messages.is_empty() || output.send(Batch { reply_to, messages }).is_ok()
    };

    let startup = authority.start();
    if !send(None, pushes_to_messages(None, startup)) {
        return;
    }

    while let Ok(message) = input.recv() {
        let (reply_to, messages) = match message {
            AuthorityInput::Request { id, payload } => {
                let (response, pushes) = match serde_json::from_str::<AuthorityRequest>(&payload) {
                    Ok(request) => authority.handle_request(request),
                    Err(e) => {
                        tracing::warn!(error = %e, "malformed authority request ignored");
                        (AuthorityResponse::Done, Vec::new())
                    }
                };
                (Some(id), pushes_to_messages(Some(response), pushes))
            }
            AuthorityInput::ContentChanged => (None, pushes_to_messages(None, authority.content_changed())),
            AuthorityInput::Shutdown => {
                tracing::debug!("authority shutting down");
                return;
            }
        };

        if !send(reply_to, messages) {
            return;
        }
    }
}

fn pushes_to_messages(reply: Option<AuthorityResponse>, pushes: Vec<AuthorityPush>) -> Vec<AuthorityMessage> {
    reply
        .map(|response| AuthorityMessage::Reply { response })
        .into_iter()
        .chain(pushes.into_iter().map(|push| AuthorityMessage::Push { push }))
        .collect()
}

/// Transport over an [`AuthorityThread`]'s channels.
#[derive(Debug)]
pub struct ChannelTransport {
    thread: AuthorityThread,
    next_id: u64,
}

impl ChannelTransport {
    #[must_use]
    pub const fn new(thread: AuthorityThread) -> Self {
        Self { thread, next_id: 0 }
    }

    #[must_use]
    pub const fn thread(&self) -> &AuthorityThread {
        &self.thread
    }

    /// Decodes `batch` into `into`, keeping its reply only if it answers
    /// `awaiting`. Pushes are always kept.
    fn decode(batch: Batch, awaiting: Option<u64>, into: &mut Vec<AuthorityMessage>) {
        let stale = batch.reply_to.is_some() && batch.reply_to != awaiting;
        for payload in batch.messages {
            match serde_json::from_str(&payload) {
                Ok(AuthorityMessage::Reply { response }) if stale => {
                    tracing::debug!(reply_to = ?batch.reply_to, ?response, "late reply discarded");
                }
                Ok(message) => into.push(message),
                Err(e) => tracing::warn!(error = %e, "malformed authority message ignored"),
            }
        }
    }
}

impl Transport for ChannelTransport {
    fn call(&mut self, request: AuthorityRequest) -> Result<Vec<AuthorityMessage>> {
        let payload = serde_json::to_string(&request)
            .map_err(|e| PetError::Protocol(format!("failed to encode {}: {e}", request.name())))?;

        self.next_id += 1;
        let id = self.next_id;
        self.thread
            .sender
            .send(AuthorityInput::Request { id, payload })
            .map_err(|_| PetError::Protocol("authority thread is gone".to_string()))?;

        let mut messages = Vec::new();
        loop {
            let batch = self
                .thread
                .receiver
                .recv_timeout(REPLY_TIMEOUT)
                .map_err(|e| PetError::Protocol(format!("no reply to {}: {e}", request.name())))?;

            let answered = batch.reply_to == Some(id);
            Self::decode(batch, Some(id), &mut messages);
            if answered {
                return Ok(messages);
            }
        }
    }

    fn poll(&mut self) -> Vec<AuthorityMessage> {
        let mut messages = Vec::new();
        while let Ok(batch) = self.thread.receiver.try_recv() {
            Self::decode(batch, None, &mut messages);
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::AuthorityParts;
    use crate::domain::{ScreenMetrics, Tuning, WindowPosition};
    use crate::surface::{FixedDisplay, HeadlessSurface};

    fn spawn_transport(dir: &std::path::Path) -> ChannelTransport {
        let authority = Authority::new(AuthorityParts {
            sprite: Box::new(HeadlessSurface::new("sprite")),
            bubble: Box::new(HeadlessSurface::new("bubble")),
            display: Box::new(FixedDisplay::new(ScreenMetrics::new(1920, 1080))),
            todo_path: dir.join("todo.txt"),
            tuning: Tuning::default(),
        });
        ChannelTransport::new(AuthorityThread::spawn(authority).unwrap())
    }

    #[test]
    fn round_trip_through_thread() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = spawn_transport(dir.path());
        let messages = transport.call(AuthorityRequest::set_position(10.0, 20.0)).unwrap();

        assert!(messages.contains(&AuthorityMessage::Reply {
            response: AuthorityResponse::Ack { ok: true }
        }));
        assert!(messages.contains(&AuthorityMessage::Push {
            push: AuthorityPush::PositionChanged {
                position: WindowPosition::new(10, 20)
            }
        }));
    }

    #[test]
    fn late_reply_is_not_taken_by_next_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = spawn_transport(dir.path());

        // A request whose caller already gave up waiting.
        let abandoned = serde_json::to_string(&AuthorityRequest::get_position()).unwrap();
        transport
            .thread
            .sender
            .send(AuthorityInput::Request { id: 99, payload: abandoned })
            .unwrap();

        let messages = transport.call(AuthorityRequest::set_position(10.0, 20.0)).unwrap();
        let replies: Vec<_> = messages
            .iter()
            .filter(|m| matches!(m, AuthorityMessage::Reply { .. }))
            .collect();

        assert_eq!(
            replies,
            vec![&AuthorityMessage::Reply {
                response: AuthorityResponse::Ack { ok: true }
            }]
        );
        assert!(transport.poll().iter().all(|m| matches!(m, AuthorityMessage::Push { .. })));
    }
}
