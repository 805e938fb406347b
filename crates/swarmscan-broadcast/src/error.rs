//! Broadcast errors.

/// Errors from the broadcast transport.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
  /// No usable socket could be opened. An environment fault.
  #[error("failed to open broadcast socket: {source}")]
  Bind {
    #[source]
    source: std::io::Error,
  },

  /// The descriptor could not be serialized.
  #[error("failed to encode task: {source}")]
  Encode {
    #[source]
    source: serde_json::Error,
  },

  /// The datagram could not be sent.
  #[error("failed to send task datagram: {source}")]
  Send {
    #[source]
    source: std::io::Error,
  },
}
