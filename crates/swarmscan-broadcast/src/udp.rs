use std::net::{Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use swarmscan_task::TaskDescriptor;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::BroadcastError;
use crate::{BroadcastConfig, TaskBroadcaster};

/// Broadcasts task descriptors as single UDP datagrams.
pub struct UdpTaskBroadcaster {
  socket: UdpSocket,
  addr: SocketAddr,
}

impl UdpTaskBroadcaster {
  /// Open an ephemeral IPv4 socket with `SO_BROADCAST` set.
  ///
  /// Fails when no usable interface exists; callers treat that as an
  /// environment fault.
  pub async fn bind(config: BroadcastConfig) -> Result<Self, BroadcastError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
      .await
      .map_err(|source| BroadcastError::Bind { source })?;
    socket
      .set_broadcast(true)
      .map_err(|source| BroadcastError::Bind { source })?;

    Ok(Self {
      socket,
      addr: config.addr,
    })
  }

  /// The endpoint datagrams are sent to.
  pub fn addr(&self) -> SocketAddr {
    self.addr
  }
}

#[async_trait]
impl TaskBroadcaster for UdpTaskBroadcaster {
  async fn broadcast(&self, task: &TaskDescriptor) -> Result<(), BroadcastError> {
    let payload = serde_json::to_vec(task).map_err(|source| BroadcastError::Encode { source })?;

    self
      .socket
      .send_to(&payload, self.addr)
      .await
      .map_err(|source| BroadcastError::Send { source })?;

    debug!(kind = %task.kind, target = %task.target, "task broadcast");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use swarmscan_task::TaskKind;

  #[tokio::test]
  async fn sends_one_decodable_datagram_per_call() {
    let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let config = BroadcastConfig {
      addr: receiver.local_addr().unwrap(),
    };

    let broadcaster = UdpTaskBroadcaster::bind(config).await.unwrap();
    assert_eq!(broadcaster.addr(), config.addr);

    let task = TaskDescriptor::new(TaskKind::GitLeaker, "https://example.com");
    broadcaster.broadcast(&task).await.unwrap();

    let mut buf = [0u8; 2048];
    let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
    let received: TaskDescriptor = serde_json::from_slice(&buf[..len]).unwrap();
    assert_eq!(received, task);
  }

  #[test]
  fn default_config_targets_the_well_known_endpoint() {
    let config = BroadcastConfig::default();
    assert_eq!(config.addr, SocketAddr::from((Ipv4Addr::BROADCAST, 8888)));
  }
}
