//! Event stream errors.

/// Errors from the event stream client.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
  /// The relay connection could not be established. Fatal to the caller:
  /// without the stream no completion can ever be observed.
  #[error("failed to connect to relay: {message}")]
  Connect { message: String },

  /// The open stream failed in a way that makes it unusable.
  #[error("event stream transport error: {message}")]
  Transport { message: String },
}
