use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use crate::envelope::EventEnvelope;
use crate::error::EventError;

/// A lazy, unbounded sequence of inbound event envelopes.
///
/// `next` blocks until a decodable frame arrives or the stream ends; it has no
/// internal timeout. Callers compose cancellation or deadlines around it
/// (e.g. `tokio::select!` with a `CancellationToken`).
#[async_trait]
pub trait EventStream: Send {
  /// The next envelope, `Ok(None)` once the peer has closed the stream, or
  /// `Err` on a transport fault that makes the stream unusable.
  async fn next(&mut self) -> Result<Option<EventEnvelope>, EventError>;
}

/// Something that can open an [`EventStream`].
///
/// The connection seam: production uses [`RelayClient`], tests use in-process
/// fakes. Handshake failure is fatal to the caller.
#[async_trait]
pub trait EventSource: Send + Sync {
  type Stream: EventStream;

  async fn connect(&self) -> Result<Self::Stream, EventError>;
}

/// Connects to the relay's WebSocket endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
  url: String,
}

impl RelayClient {
  /// The relay endpoint on the local daemon.
  pub const DEFAULT_URL: &'static str = "ws://127.0.0.1:8889";

  pub fn new(url: impl Into<String>) -> Self {
    Self { url: url.into() }
  }

  pub fn url(&self) -> &str {
    &self.url
  }
}

impl Default for RelayClient {
  fn default() -> Self {
    Self::new(Self::DEFAULT_URL)
  }
}

#[async_trait]
impl EventSource for RelayClient {
  type Stream = RelayStream;

  async fn connect(&self) -> Result<RelayStream, EventError> {
    let (inner, _response) =
      connect_async(self.url.as_str())
        .await
        .map_err(|e| EventError::Connect {
          message: e.to_string(),
        })?;

    info!(url = %self.url, "connected to relay event stream");
    Ok(RelayStream { inner })
  }
}

/// One open relay connection.
///
/// Receive-only: the orchestrator never writes on this channel. Dropping the
/// stream tears the connection down, so scoped ownership releases it on every
/// exit path.
pub struct RelayStream {
  inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl EventStream for RelayStream {
  async fn next(&mut self) -> Result<Option<EventEnvelope>, EventError> {
    loop {
      match self.inner.next().await {
        None => return Ok(None),
        Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
          Ok(envelope) => return Ok(Some(envelope)),
          Err(e) => debug!(error = %e, "skipping undecodable relay frame"),
        },
        Some(Ok(Message::Binary(data))) => match serde_json::from_slice(&data) {
          Ok(envelope) => return Ok(Some(envelope)),
          Err(e) => debug!(error = %e, "skipping undecodable relay frame"),
        },
        Some(Ok(Message::Close(_))) => return Ok(None),
        // Ping/pong and raw frames are handled by the protocol layer.
        Some(Ok(_)) => {}
        Some(Err(e)) => {
          return Err(EventError::Transport {
            message: e.to_string(),
          });
        }
      }
    }
  }
}
