use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationId;

/// The statically known scan kinds agents select on.
///
/// Wire names are the snake_case strings agents match against; `Crawler` is
/// the discovery kind and the rest are the scan plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
  Crawler,
  CredStuffer,
  GitLeaker,
  S3Scan,
  SsrfScanner,
  LfiScanner,
  DependencyConfusion,
  SqlInjector,
  XssHunter,
  ApiFuzzer,
}

impl TaskKind {
  /// The fixed fan-out set: every scan kind dispatched per discovered URL,
  /// in dispatch order.
  pub const FAN_OUT: [TaskKind; 9] = [
    TaskKind::CredStuffer,
    TaskKind::GitLeaker,
    TaskKind::S3Scan,
    TaskKind::SsrfScanner,
    TaskKind::LfiScanner,
    TaskKind::DependencyConfusion,
    TaskKind::SqlInjector,
    TaskKind::XssHunter,
    TaskKind::ApiFuzzer,
  ];

  /// The snake_case name agents see on the wire.
  pub fn wire_name(&self) -> &'static str {
    match self {
      TaskKind::Crawler => "crawler",
      TaskKind::CredStuffer => "cred_stuffer",
      TaskKind::GitLeaker => "git_leaker",
      TaskKind::S3Scan => "s3_scan",
      TaskKind::SsrfScanner => "ssrf_scanner",
      TaskKind::LfiScanner => "lfi_scanner",
      TaskKind::DependencyConfusion => "dependency_confusion",
      TaskKind::SqlInjector => "sql_injector",
      TaskKind::XssHunter => "xss_hunter",
      TaskKind::ApiFuzzer => "api_fuzzer",
    }
  }
}

impl fmt::Display for TaskKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.wire_name())
  }
}

impl FromStr for TaskKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "crawler" => Ok(TaskKind::Crawler),
      "cred_stuffer" => Ok(TaskKind::CredStuffer),
      "git_leaker" => Ok(TaskKind::GitLeaker),
      "s3_scan" => Ok(TaskKind::S3Scan),
      "ssrf_scanner" => Ok(TaskKind::SsrfScanner),
      "lfi_scanner" => Ok(TaskKind::LfiScanner),
      "dependency_confusion" => Ok(TaskKind::DependencyConfusion),
      "sql_injector" => Ok(TaskKind::SqlInjector),
      "xss_hunter" => Ok(TaskKind::XssHunter),
      "api_fuzzer" => Ok(TaskKind::ApiFuzzer),
      other => Err(format!("unknown task kind: {other}")),
    }
  }
}

/// A work request broadcast to the agent swarm.
///
/// One descriptor is serialized per datagram. `correlation_id` is present only
/// on discovery tasks whose completion the sender intends to wait for; fan-out
/// tasks are fire-and-forget and carry none. `extra` passes through any keys
/// this version does not model, so newer agents and older CLIs can coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
  #[serde(rename = "type")]
  pub kind: TaskKind,
  pub target: String,
  #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
  pub correlation_id: Option<CorrelationId>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskDescriptor {
  /// An uncorrelated task: no response is expected.
  pub fn new(kind: TaskKind, target: impl Into<String>) -> Self {
    Self {
      kind,
      target: target.into(),
      correlation_id: None,
      extra: serde_json::Map::new(),
    }
  }

  /// A correlated task whose completion event will carry `id`.
  pub fn with_correlation(kind: TaskKind, target: impl Into<String>, id: CorrelationId) -> Self {
    Self {
      kind,
      target: target.into(),
      correlation_id: Some(id),
      extra: serde_json::Map::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_exactly() {
    let mut task = TaskDescriptor::with_correlation(
      TaskKind::Crawler,
      "https://example.com",
      CorrelationId::generate().unwrap(),
    );
    task
      .extra
      .insert("depth".to_string(), serde_json::json!(3));

    let json = serde_json::to_string(&task).unwrap();
    let back: TaskDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, task);
  }

  #[test]
  fn uncorrelated_task_omits_id_key() {
    let task = TaskDescriptor::new(TaskKind::S3Scan, "https://example.com");
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["type"], "s3_scan");
    assert_eq!(json["target"], "https://example.com");
    assert!(json.get("id").is_none());
  }

  #[test]
  fn wire_names_round_trip_through_from_str() {
    for kind in TaskKind::FAN_OUT.iter().chain([TaskKind::Crawler].iter()) {
      assert_eq!(kind.wire_name().parse::<TaskKind>().unwrap(), *kind);
    }
  }

  #[test]
  fn fan_out_set_excludes_crawler() {
    assert_eq!(TaskKind::FAN_OUT.len(), 9);
    assert!(!TaskKind::FAN_OUT.contains(&TaskKind::Crawler));
  }

  #[test]
  fn serde_names_match_wire_names() {
    let json = serde_json::to_value(TaskKind::DependencyConfusion).unwrap();
    assert_eq!(json, "dependency_confusion");
    let json = serde_json::to_value(TaskKind::S3Scan).unwrap();
    assert_eq!(json, "s3_scan");
  }
}
