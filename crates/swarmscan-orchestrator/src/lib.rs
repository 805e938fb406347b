//! Swarmscan Orchestrator
//!
//! Drives one full discovery-then-fan-out cycle against a target:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   AttackOrchestrator                    │
//! │  1. connect to the relay event stream (fatal on error)  │
//! │  2. generate a correlation id                           │
//! │  3. broadcast the crawl task carrying the id            │
//! │  4. read envelopes until the matching CRAWL_COMPLETE    │
//! │  5. fan out every (discovered URL × scan kind) pair     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The run is one sequential flow of control; the event-stream read is its
//! only suspension point and is interruptible via a `CancellationToken`.

mod error;
mod orchestrator;
mod outcome;

pub use error::AttackError;
pub use orchestrator::AttackOrchestrator;
pub use outcome::{AttackOutcome, NoCompletionReason};
