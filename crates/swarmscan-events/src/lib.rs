//! Swarmscan Events
//!
//! This crate models the inbound side of the swarm protocol: the
//! [`EventEnvelope`] agents publish to the relay, and the [`EventStream`] /
//! [`EventSource`] traits the orchestrator consumes envelopes through.
//!
//! [`RelayClient`] is the production source: one long-lived WebSocket
//! connection to the relay, receive-only, yielding decoded envelopes until the
//! peer closes. Undecodable frames are noise on a shared stream and are
//! skipped, never fatal.

mod envelope;
mod error;
mod stream;

pub use envelope::{EventEnvelope, EventKind};
pub use error::EventError;
pub use stream::{EventSource, EventStream, RelayClient, RelayStream};
