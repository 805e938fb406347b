use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use swarmscan_broadcast::{BroadcastConfig, TaskBroadcaster, UdpTaskBroadcaster};
use swarmscan_events::RelayClient;
use swarmscan_orchestrator::{AttackOrchestrator, AttackOutcome};
use swarmscan_task::{TaskDescriptor, TaskKind};

/// Swarmscan - decentralized security auditing over an agent swarm
#[derive(Parser)]
#[command(name = "swarmscan")]
#[command(version, about, long_about = None)]
struct Cli {
  /// UDP endpoint task broadcasts are sent to
  #[arg(long, global = true, default_value = "255.255.255.255:8888")]
  broadcast_addr: SocketAddr,

  /// WebSocket URL of the event relay
  #[arg(long, global = true, default_value = RelayClient::DEFAULT_URL)]
  relay_url: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Broadcast a single on-demand scan task
  Scan {
    target: String,
    /// Scan kind to perform (e.g. git_leaker, s3_scan)
    #[arg(long = "type", default_value = "cred_stuffer")]
    kind: TaskKind,
  },

  /// Broadcast every available scan kind against one target
  ScanAll { target: String },

  /// Crawl a website to discover all accessible URLs
  Crawl { target: String },

  /// Scan for exposed Git repositories
  GitScan { target: String },

  /// Scan for exposed S3 buckets
  S3Scan { target: String },

  /// Scan a URL for SSRF vulnerabilities
  SsrfScan { url: String },

  /// Scan a URL for SQL-injection vulnerabilities
  SqlScan { url: String },

  /// Scan a URL for XSS vulnerabilities
  XssScan { url: String },

  /// Fuzz an API for common vulnerabilities
  ApiFuzz { url: String },

  /// Crawl a target, then run every scan kind on every discovered URL
  Attack { target: String },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
  let config = BroadcastConfig {
    addr: cli.broadcast_addr,
  };
  let broadcaster = UdpTaskBroadcaster::bind(config)
    .await
    .context("failed to open broadcast socket")?;

  match cli.command {
    Commands::Scan { target, kind } => broadcast_one(&broadcaster, kind, &target).await,
    Commands::ScanAll { target } => {
      println!("performing all scans on {target}...");
      let dispatched = scan_all(&broadcaster, &target).await;
      println!("{dispatched} scan tasks broadcast to swarm");
      Ok(())
    }
    Commands::Crawl { target } => broadcast_one(&broadcaster, TaskKind::Crawler, &target).await,
    Commands::GitScan { target } => broadcast_one(&broadcaster, TaskKind::GitLeaker, &target).await,
    Commands::S3Scan { target } => broadcast_one(&broadcaster, TaskKind::S3Scan, &target).await,
    Commands::SsrfScan { url } => broadcast_one(&broadcaster, TaskKind::SsrfScanner, &url).await,
    Commands::SqlScan { url } => broadcast_one(&broadcaster, TaskKind::SqlInjector, &url).await,
    Commands::XssScan { url } => broadcast_one(&broadcaster, TaskKind::XssHunter, &url).await,
    Commands::ApiFuzz { url } => broadcast_one(&broadcaster, TaskKind::ApiFuzzer, &url).await,
    Commands::Attack { target } => attack(broadcaster, cli.relay_url, target).await,
  }
}

/// Queue one task per fan-out kind; an individual failed send does not stop
/// the remaining kinds. Returns the number of tasks that left this host.
async fn scan_all(broadcaster: &impl TaskBroadcaster, target: &str) -> usize {
  let mut dispatched = 0usize;
  for kind in TaskKind::FAN_OUT {
    println!("  -> queuing {kind} scan");
    let task = TaskDescriptor::new(kind, target);
    match broadcaster.broadcast(&task).await {
      Ok(()) => dispatched += 1,
      Err(e) => eprintln!("warning: failed to broadcast {kind} task: {e}"),
    }
  }
  dispatched
}

/// Serialize one task and fire it at the swarm.
async fn broadcast_one(
  broadcaster: &UdpTaskBroadcaster,
  kind: TaskKind,
  target: &str,
) -> Result<()> {
  println!("scanning {target} (type: {kind})...");
  let task = TaskDescriptor::new(kind, target);
  broadcaster
    .broadcast(&task)
    .await
    .with_context(|| format!("failed to broadcast {kind} task"))?;
  println!("scan task broadcast to swarm");
  Ok(())
}

/// The full discovery-then-fan-out run. Ctrl-C cancels cooperatively.
async fn attack(broadcaster: UdpTaskBroadcaster, relay_url: String, target: String) -> Result<()> {
  println!("--- launching full attack on {target} ---");

  let cancel = CancellationToken::new();
  let signal_cancel = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      signal_cancel.cancel();
    }
  });

  let source = RelayClient::new(relay_url);
  let orchestrator = AttackOrchestrator::new(broadcaster);

  match orchestrator.run(&source, &target, cancel).await? {
    AttackOutcome::Completed {
      discovered,
      dispatched,
    } => {
      println!(
        "--- full attack complete: {dispatched} scan tasks dispatched across {discovered} URLs ---"
      );
      Ok(())
    }
    AttackOutcome::NoCompletion { reason } => {
      bail!("no completion observed ({reason}); no fan-out attempted")
    }
  }
}

/// Install the tracing subscriber, overridable via RUST_LOG.
fn init_tracing() {
  use tracing_subscriber::{EnvFilter, fmt, prelude::*};

  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,swarmscan=debug"));

  tracing_subscriber::registry()
    .with(fmt::layer().with_target(true))
    .with(filter)
    .init();
}
