//! # pairchat-session
//!
//! The duplex session loop and its collaborators.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `queue` | Bounded FIFO hand-off from the input producer to the writer |
//! | `transport` | `PeerSender` / `PeerReceiver` boundary traits and errors |
//! | `wire` | The one-frame-per-message JSON payload |
//! | `session` | Reader/writer tasks, state machine, graceful shutdown |
//!
//! ## Data flow
//!
//! input producer → `queue` → `session` writer → `PeerSender::send`;
//! `PeerReceiver::receive` → `session` reader → tag decode → `DisplaySink`.

#![deny(unsafe_code)]

pub mod queue;
pub mod session;
pub mod transport;
pub mod wire;

pub use queue::{OutboundProducer, OutboundQueue, QueueClosed};
pub use session::{CloseReason, DisplaySink, Session, SessionHandle, SessionReport, SessionState};
pub use transport::{ConnectError, PeerReceiver, PeerSender, RecvError, SendError};
