//! Attack run outcomes.

use std::fmt;

/// Why a run ended without observing its completion event.
///
/// Both are normal negative outcomes, not errors; they are distinguished so
/// the operator can tell "no agent answered" from "the relay went away".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCompletionReason {
  /// The relay closed the stream cleanly before a match arrived.
  StreamClosed,
  /// The stream failed mid-wait.
  StreamError,
}

impl fmt::Display for NoCompletionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NoCompletionReason::StreamClosed => f.write_str("event stream closed"),
      NoCompletionReason::StreamError => f.write_str("event stream error"),
    }
  }
}

/// How an attack run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
  /// The crawl completed and fan-out ran.
  Completed {
    /// URLs in the received sitemap.
    discovered: usize,
    /// Fan-out tasks successfully sent.
    dispatched: usize,
  },

  /// The stream ended before the completion event arrived. Expected when no
  /// agent handles the discovery task; no fan-out is attempted.
  NoCompletion { reason: NoCompletionReason },
}
