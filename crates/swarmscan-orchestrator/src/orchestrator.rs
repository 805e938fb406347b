use swarmscan_broadcast::TaskBroadcaster;
use swarmscan_events::{EventSource, EventStream};
use swarmscan_task::{CorrelationId, TaskDescriptor, TaskKind};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AttackError;
use crate::outcome::{AttackOutcome, NoCompletionReason};

/// Runs the discovery-then-fan-out cycle.
///
/// Generic over the broadcaster so tests can substitute an in-process fake;
/// the event source is injected per run.
pub struct AttackOrchestrator<B> {
  broadcaster: B,
  fan_out: Vec<TaskKind>,
}

impl<B: TaskBroadcaster> AttackOrchestrator<B> {
  /// An orchestrator fanning out the full scan kind set.
  pub fn new(broadcaster: B) -> Self {
    Self::with_fan_out(broadcaster, TaskKind::FAN_OUT.to_vec())
  }

  /// An orchestrator with a custom fan-out set.
  pub fn with_fan_out(broadcaster: B, fan_out: Vec<TaskKind>) -> Self {
    Self {
      broadcaster,
      fan_out,
    }
  }

  /// Drive one full cycle against `target`.
  ///
  /// Connects first: if the relay is unreachable nothing is broadcast. The
  /// stream is owned by this call and dropped on every exit path. The wait
  /// for the completion event is unbounded; `cancel` is the caller's handle
  /// to interrupt it.
  pub async fn run<S: EventSource>(
    &self,
    source: &S,
    target: &str,
    cancel: CancellationToken,
  ) -> Result<AttackOutcome, AttackError> {
    let mut stream = source
      .connect()
      .await
      .map_err(|source| AttackError::Relay { source })?;

    let correlation_id = CorrelationId::generate()?;

    info!(%target, id = %correlation_id, "broadcasting crawl task");
    let discovery =
      TaskDescriptor::with_correlation(TaskKind::Crawler, target, correlation_id.clone());
    self
      .broadcaster
      .broadcast(&discovery)
      .await
      .map_err(|source| AttackError::Broadcast { source })?;

    info!("awaiting sitemap from crawler");
    let sitemap = loop {
      tokio::select! {
        _ = cancel.cancelled() => return Err(AttackError::Cancelled),
        frame = stream.next() => match frame {
          Ok(Some(envelope)) if envelope.is_completion_of(&correlation_id) => {
            match envelope.sitemap() {
              Some(urls) => break urls,
              // A completion without a sitemap carries nothing to fan out on.
              None => debug!("completion event without sitemap evidence, skipping"),
            }
          }
          Ok(Some(envelope)) => {
            debug!(kind = ?envelope.vuln_type, "skipping unrelated envelope");
          }
          Ok(None) => {
            info!("event stream closed before crawl completed");
            return Ok(AttackOutcome::NoCompletion {
              reason: NoCompletionReason::StreamClosed,
            });
          }
          Err(e) => {
            warn!(error = %e, "event stream failed before crawl completed");
            return Ok(AttackOutcome::NoCompletion {
              reason: NoCompletionReason::StreamError,
            });
          }
        }
      }
    };

    info!(urls = sitemap.len(), "sitemap received, fanning out scans");
    let mut dispatched = 0usize;
    for url in &sitemap {
      for kind in &self.fan_out {
        let task = TaskDescriptor::new(*kind, url.clone());
        match self.broadcaster.broadcast(&task).await {
          Ok(()) => dispatched += 1,
          // One failed send must not abort the rest of the fan-out.
          Err(e) => warn!(%url, %kind, error = %e, "fan-out broadcast failed"),
        }
      }
    }

    info!(
      discovered = sitemap.len(),
      dispatched, "attack run complete"
    );
    Ok(AttackOutcome::Completed {
      discovered: sitemap.len(),
      dispatched,
    })
  }

  /// The broadcaster this orchestrator sends through.
  pub fn broadcaster(&self) -> &B {
    &self.broadcaster
  }
}
