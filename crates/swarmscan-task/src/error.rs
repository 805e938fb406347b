//! Task-layer errors.

/// Errors from the task layer.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
  /// The OS entropy source could not produce random bytes.
  ///
  /// This is an unrecoverable environment fault, not a retryable error.
  #[error("entropy source unavailable: {source}")]
  Entropy {
    #[source]
    source: rand::Error,
  },
}
