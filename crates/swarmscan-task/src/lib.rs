//! Swarmscan Task
//!
//! This crate contains the wire-level task types shared by the swarmscan CLI
//! and orchestrator: the [`TaskDescriptor`] broadcast to agents and the
//! [`CorrelationId`] used to tie a request to its eventual completion event.
//!
//! Descriptors are value objects. They are created fresh per broadcast,
//! serialized once, and never persisted.

mod correlation;
mod descriptor;
mod error;

pub use correlation::CorrelationId;
pub use descriptor::{TaskDescriptor, TaskKind};
pub use error::TaskError;
