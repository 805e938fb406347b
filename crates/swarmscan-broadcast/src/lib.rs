//! Swarmscan Broadcast
//!
//! This crate provides the [`TaskBroadcaster`] trait and its UDP
//! implementation. A broadcast is one serialized [`TaskDescriptor`] per
//! datagram, sent once to the segment's well-known broadcast endpoint: no
//! delivery confirmation, no retry, no ordering across calls. Agents within
//! broadcast range self-select on the task kind.
//!
//! The trait is the seam that keeps the orchestrator testable with an
//! in-process fake transport.

mod error;
mod udp;

pub use error::BroadcastError;
pub use udp::UdpTaskBroadcaster;

use std::net::{Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use swarmscan_task::TaskDescriptor;

/// Where task datagrams are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastConfig {
  pub addr: SocketAddr,
}

impl Default for BroadcastConfig {
  fn default() -> Self {
    // The swarm's well-known endpoint: limited broadcast on port 8888.
    Self {
      addr: SocketAddr::from((Ipv4Addr::BROADCAST, 8888)),
    }
  }
}

/// Transmits task descriptors to the agent swarm, best effort.
#[async_trait]
pub trait TaskBroadcaster: Send + Sync {
  /// Serialize `task` and send it once.
  ///
  /// `Ok` means the datagram left this host, nothing more. Errors are
  /// reported to the caller and the call has no other effect.
  async fn broadcast(&self, task: &TaskDescriptor) -> Result<(), BroadcastError>;
}
