//! The transport boundary.
//!
//! The session never touches WebSocket framing directly; it talks to two
//! narrow traits supplied by the host. The send half is only ever driven by
//! the writer path (including the final close frame), so implementations need
//! no internal locking between directions. Releasing the underlying
//! connection is `Drop`.

use async_trait::async_trait;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The transport handshake failed; no session was created.
#[derive(Debug, Error)]
#[error("connect failed: {0}")]
pub struct ConnectError(#[source] BoxError);

impl ConnectError {
    /// Wrap an underlying handshake error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self(source.into())
    }
}

/// A transport-level write failure; fatal to the current session.
#[derive(Debug, Error)]
#[error("transport send failed: {0}")]
pub struct SendError(#[source] BoxError);

impl SendError {
    /// Wrap an underlying write error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self(source.into())
    }
}

/// A transport-level read failure; fatal to the current session.
#[derive(Debug, Error)]
#[error("transport receive failed: {0}")]
pub struct RecvError(#[source] BoxError);

impl RecvError {
    /// Wrap an underlying read error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self(source.into())
    }
}

/// Send half of the peer connection. Driven only by the session writer.
#[async_trait]
pub trait PeerSender: Send {
    /// Send one text frame carrying one application message.
    async fn send(&mut self, frame: String) -> Result<(), SendError>;

    /// Send the transport's close frame to start the shutdown handshake.
    async fn send_close(&mut self) -> Result<(), SendError>;
}

/// Receive half of the peer connection. Driven only by the session reader.
#[async_trait]
pub trait PeerReceiver: Send {
    /// Wait for the next inbound text frame.
    ///
    /// `Ok(None)` means the peer ended the connection normally; any I/O
    /// failure is a [`RecvError`].
    async fn receive(&mut self) -> Result<Option<String>, RecvError>;
}
