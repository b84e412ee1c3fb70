//! The session state machine: one connection, one reader, one writer.
//!
//! A [`Session`] exists only after the transport handshake has succeeded.
//! [`Session::start`] spawns the reader task; [`Session::run`] drives the
//! writer loop on the caller's task until the session reaches `Closed` and
//! returns a [`SessionReport`].
//!
//! The writer loop is the single owner of the send half, so every write —
//! including the close frame during shutdown — goes through one path and
//! needs no locking against the reader.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use pairchat_core::{DecodeError, Message};

use crate::queue::OutboundQueue;
use crate::transport::{PeerReceiver, PeerSender, RecvError};
use crate::wire::{self, MAX_FRAME_BYTES};

/// Bound on waiting for the peer's close acknowledgment.
///
/// Elapsing is not an error; it is the expected ceiling on a graceful
/// shutdown when the peer never answers.
pub const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Lifecycle states of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Transport handshake in progress. The handshake completes before
    /// [`Session::start`], so a [`SessionHandle`] never observes this
    /// state; it names the phase a host is in while it has no session.
    Connecting,
    /// Reader and writer running concurrently.
    Active,
    /// Close frame sent or fatal error observed; waiting for the tasks.
    Closing,
    /// Terminal; both tasks have exited.
    Closed,
}

/// Why the session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// Local cancellation or end of input; graceful close was attempted.
    LocalStop,
    /// The peer ended the connection normally.
    PeerClosed,
    /// A fatal read or write failure; the connection was presumed unusable.
    TransportError(String),
}

/// How the session ended, reported once from [`Session::run`].
#[derive(Debug)]
pub struct SessionReport {
    /// Why the session closed.
    pub reason: CloseReason,
    /// Messages that were enqueued but never reached the peer.
    pub undelivered: Vec<Message>,
}

/// Consumer of everything the session wants shown to the user.
///
/// Calls arrive from the reader task in wire order. Implementations should
/// not block for long; the reader does not receive while a call is running.
pub trait DisplaySink: Send + 'static {
    /// A decoded inbound message.
    fn message(&mut self, message: Message);

    /// An inbound frame was dropped because it could not be decoded.
    fn decode_failure(&mut self, error: DecodeError);

    /// The peer ended the connection normally.
    fn peer_closed(&mut self);
}

/// How the reader task ended.
#[derive(Debug)]
enum ReaderOutcome {
    PeerClosed,
    Failed(RecvError),
}

/// Cloneable handle for requesting shutdown and observing state.
#[derive(Clone)]
pub struct SessionHandle {
    cancel: CancellationToken,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Request a graceful transition to `Closing`. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Wait until the session reaches `Closed`.
    pub async fn closed(&mut self) {
        while *self.state_rx.borrow_and_update() != SessionState::Closed {
            if self.state_rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// One active point-to-point connection.
pub struct Session {
    state_tx: watch::Sender<SessionState>,
    cancel: CancellationToken,
    reader: JoinHandle<ReaderOutcome>,
    sender: Box<dyn PeerSender>,
    queue: OutboundQueue,
    close_grace: Duration,
}

impl Session {
    /// Activate a session over an established connection.
    ///
    /// Spawns the reader task immediately; the writer runs inside
    /// [`Session::run`]. A process holds at most one session at a time.
    pub fn start(
        sender: impl PeerSender + 'static,
        receiver: impl PeerReceiver + 'static,
        queue: OutboundQueue,
        display: impl DisplaySink,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Active);
        let reader = tokio::spawn(read_loop(Box::new(receiver), Box::new(display)));
        info!("session active");
        Self {
            state_tx,
            cancel: CancellationToken::new(),
            reader,
            sender: Box::new(sender),
            queue,
            close_grace: CLOSE_GRACE,
        }
    }

    /// Override the close-acknowledgment grace period.
    #[must_use]
    pub fn with_close_grace(mut self, grace: Duration) -> Self {
        self.close_grace = grace;
        self
    }

    /// Handle for stopping the session from another task.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            cancel: self.cancel.clone(),
            state_rx: self.state_tx.subscribe(),
        }
    }

    /// Drive the writer loop until the session is `Closed`.
    ///
    /// Outbound messages are sent strictly in enqueue order. Returns once
    /// both tasks have exited, with any queued-but-unsent messages listed in
    /// the report.
    pub async fn run(self) -> SessionReport {
        let Self {
            state_tx,
            cancel,
            mut reader,
            mut sender,
            mut queue,
            close_grace,
        } = self;

        let mut unsent: Vec<Message> = Vec::new();
        let reason = loop {
            tokio::select! {
                // A stop request or the reader exiting must win over
                // dequeuing: once the peer is gone, queued messages are
                // reported undelivered rather than written into the void.
                biased;

                () = cancel.cancelled() => {
                    info!("stop requested");
                    break close_gracefully(&state_tx, &mut *sender, &mut reader, close_grace).await;
                }
                outcome = &mut reader => {
                    state_tx.send_replace(SessionState::Closing);
                    break match outcome {
                        Ok(ReaderOutcome::PeerClosed) => {
                            info!("peer closed the connection");
                            CloseReason::PeerClosed
                        }
                        Ok(ReaderOutcome::Failed(e)) => {
                            warn!(error = %e, "read failed");
                            CloseReason::TransportError(e.to_string())
                        }
                        Err(join_err) => {
                            warn!(error = %join_err, "reader task aborted");
                            CloseReason::TransportError(join_err.to_string())
                        }
                    };
                }
                maybe = queue.dequeue() => {
                    match maybe {
                        Some(message) => {
                            if let Some(reason) =
                                write_message(&mut *sender, message, &mut unsent).await
                            {
                                // The connection is presumed unusable: no
                                // graceful wait, stop the reader as well.
                                reader.abort();
                                state_tx.send_replace(SessionState::Closing);
                                break reason;
                            }
                        }
                        None => {
                            info!("input ended");
                            break close_gracefully(&state_tx, &mut *sender, &mut reader, close_grace).await;
                        }
                    }
                }
            }
        };

        unsent.extend(queue.drain());
        state_tx.send_replace(SessionState::Closed);
        if !unsent.is_empty() {
            warn!(count = unsent.len(), "messages were queued but never delivered");
        }
        SessionReport {
            reason,
            undelivered: unsent,
        }
    }
}

/// Send one message; on a recoverable local problem the message lands in
/// `unsent` and the session continues. Returns a close reason only for a
/// fatal transport failure.
async fn write_message(
    sender: &mut dyn PeerSender,
    message: Message,
    unsent: &mut Vec<Message>,
) -> Option<CloseReason> {
    let frame = match wire::encode_frame(&message) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "could not serialize outbound message");
            unsent.push(message);
            return None;
        }
    };
    if frame.len() > MAX_FRAME_BYTES {
        warn!(bytes = frame.len(), "dropping oversized outbound message");
        unsent.push(message);
        return None;
    }
    if let Err(e) = sender.send(frame).await {
        warn!(error = %e, "write failed");
        unsent.push(message);
        return Some(CloseReason::TransportError(e.to_string()));
    }
    trace!("sent one frame");
    None
}

/// Send the close frame, then race the reader's observation of connection
/// end against the grace period.
async fn close_gracefully(
    state_tx: &watch::Sender<SessionState>,
    sender: &mut dyn PeerSender,
    reader: &mut JoinHandle<ReaderOutcome>,
    grace: Duration,
) -> CloseReason {
    state_tx.send_replace(SessionState::Closing);
    if let Err(e) = sender.send_close().await {
        warn!(error = %e, "close frame failed");
        reader.abort();
        return CloseReason::TransportError(e.to_string());
    }
    match tokio::time::timeout(grace, &mut *reader).await {
        Ok(Ok(ReaderOutcome::PeerClosed)) => debug!("peer acknowledged close"),
        Ok(Ok(ReaderOutcome::Failed(e))) => debug!(error = %e, "connection ended during close"),
        Ok(Err(_)) => {}
        Err(_) => {
            // Expected bound, not a failure.
            debug!("no close acknowledgment within {grace:?}");
            reader.abort();
        }
    }
    CloseReason::LocalStop
}

/// Reader task: decode inbound frames and hand them to the display sink.
///
/// A frame that fails to decode is dropped and reported; the loop keeps
/// going. Only connection end or an I/O failure terminates it.
async fn read_loop(
    mut receiver: Box<dyn PeerReceiver>,
    mut display: Box<dyn DisplaySink>,
) -> ReaderOutcome {
    loop {
        match receiver.receive().await {
            Ok(Some(payload)) => match wire::decode_frame(&payload) {
                Ok(message) => {
                    trace!(tag = %message.tag, "received one frame");
                    display.message(message);
                }
                Err(e) => {
                    warn!(error = %e, "dropping undecodable frame");
                    display.decode_failure(e);
                }
            },
            Ok(None) => {
                display.peer_closed();
                return ReaderOutcome::PeerClosed;
            }
            Err(e) => return ReaderOutcome::Failed(e),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
