//! WebSocket transport adapter.
//!
//! Implements the session's `PeerSender` / `PeerReceiver` boundary on top of
//! `tokio-tungstenite`, for both directions of the handshake: dialing the
//! peer (`connect`) and accepting exactly one inbound peer (`PeerListener`).
//! Point-to-point only; once a connection is up, the listener is gone.

use std::net::SocketAddr;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{accept_async, connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use pairchat_session::{ConnectError, PeerReceiver, PeerSender, RecvError, SendError};

/// Request path used by the dialing side.
const WS_PATH: &str = "/chat";

/// Send half of a WebSocket peer connection.
pub struct WsSender<S> {
    sink: SplitSink<WebSocketStream<S>, WsMessage>,
}

/// Receive half of a WebSocket peer connection.
pub struct WsReceiver<S> {
    stream: SplitStream<WebSocketStream<S>>,
}

fn split<S>(ws: WebSocketStream<S>) -> (WsSender<S>, WsReceiver<S>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (sink, stream) = ws.split();
    (WsSender { sink }, WsReceiver { stream })
}

#[async_trait]
impl<S> PeerSender for WsSender<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, frame: String) -> Result<(), SendError> {
        self.sink
            .send(WsMessage::Text(frame.into()))
            .await
            .map_err(SendError::new)
    }

    async fn send_close(&mut self) -> Result<(), SendError> {
        self.sink
            .send(WsMessage::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            })))
            .await
            .map_err(SendError::new)
    }
}

#[async_trait]
impl<S> PeerReceiver for WsReceiver<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<String>, RecvError> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Ok(WsMessage::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                Some(Ok(WsMessage::Close(_))) => return Ok(None),
                // Pings are answered by the library; binary and pong frames
                // carry nothing for us.
                Some(Ok(other)) => debug!(kind = ?other, "ignoring non-text frame"),
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => return Ok(None),
                Some(Err(e)) => return Err(RecvError::new(e)),
            }
        }
    }
}

/// Dial the peer at `addr` (host:port) and complete the client handshake.
pub async fn connect(
    addr: &str,
) -> Result<
    (
        WsSender<MaybeTlsStream<TcpStream>>,
        WsReceiver<MaybeTlsStream<TcpStream>>,
    ),
    ConnectError,
> {
    let url = format!("ws://{addr}{WS_PATH}");
    info!(%url, "connecting");
    let (ws, _response) = connect_async(url.as_str()).await.map_err(ConnectError::new)?;
    info!(%url, "connected");
    Ok(split(ws))
}

/// A bound socket waiting for the single inbound peer.
pub struct PeerListener {
    inner: TcpListener,
}

impl PeerListener {
    /// Bind the listening socket. Port `0` picks an ephemeral port.
    pub async fn bind(port: u16) -> Result<Self, ConnectError> {
        let inner = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(ConnectError::new)?;
        Ok(Self { inner })
    }

    /// The bound address, useful when an ephemeral port was requested.
    pub fn local_addr(&self) -> Result<SocketAddr, ConnectError> {
        self.inner.local_addr().map_err(ConnectError::new)
    }

    /// Accept one peer and complete the server handshake.
    ///
    /// Consumes the listener: this is a point-to-point design, the first
    /// peer is the only peer.
    pub async fn accept_one(
        self,
    ) -> Result<(WsSender<TcpStream>, WsReceiver<TcpStream>), ConnectError> {
        let (tcp, peer_addr) = self.inner.accept().await.map_err(ConnectError::new)?;
        info!(%peer_addr, "peer connected");
        let ws = accept_async(tcp).await.map_err(ConnectError::new)?;
        Ok(split(ws))
    }
}
