//! Attack run errors.

use swarmscan_broadcast::BroadcastError;
use swarmscan_events::EventError;
use swarmscan_task::TaskError;

/// Errors that abort an attack run.
///
/// Only environment and connection faults live here; transient noise
/// (non-matching envelopes, individual fan-out send failures) is absorbed by
/// the run itself.
#[derive(Debug, thiserror::Error)]
pub enum AttackError {
  /// The relay connection could not be established.
  #[error("relay connection failed: {source}")]
  Relay {
    #[source]
    source: EventError,
  },

  /// The correlation id could not be generated.
  #[error(transparent)]
  Task(#[from] TaskError),

  /// The discovery broadcast itself failed. Without it no agent can ever
  /// pick up the crawl, so this is fatal, unlike fan-out send failures.
  #[error("discovery broadcast failed: {source}")]
  Broadcast {
    #[source]
    source: BroadcastError,
  },

  /// The run was cancelled while waiting on the event stream.
  #[error("attack run cancelled")]
  Cancelled,
}
