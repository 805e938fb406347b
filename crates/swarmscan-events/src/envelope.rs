use serde::{Deserialize, Serialize};
use swarmscan_task::CorrelationId;

/// What an inbound event reports.
///
/// `CrawlComplete` is the discovery completion sentinel the orchestrator waits
/// for. Agents mint finding markers freely (`DEFAULT_CREDS`, `XSS`, ...), so
/// anything else is carried verbatim as a [`EventKind::Finding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
  CrawlComplete,
  Finding(String),
}

const CRAWL_COMPLETE: &str = "CRAWL_COMPLETE";

impl From<String> for EventKind {
  fn from(s: String) -> Self {
    if s == CRAWL_COMPLETE {
      EventKind::CrawlComplete
    } else {
      EventKind::Finding(s)
    }
  }
}

impl From<EventKind> for String {
  fn from(kind: EventKind) -> Self {
    match kind {
      EventKind::CrawlComplete => CRAWL_COMPLETE.to_string(),
      EventKind::Finding(s) => s,
    }
  }
}

/// An inbound message from the relay.
///
/// The stream is shared: envelopes for other correlation ids, or of kinds the
/// reader does not care about, are expected noise. `evidence` is open,
/// event-kind-specific structure; `extra` passes through top-level keys this
/// version does not model (agents also publish `target` and `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<CorrelationId>,
  pub vuln_type: EventKind,
  #[serde(default)]
  pub evidence: serde_json::Map<String, serde_json::Value>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EventEnvelope {
  /// Whether this envelope is the discovery completion for `id`.
  pub fn is_completion_of(&self, id: &CorrelationId) -> bool {
    self.id.as_ref() == Some(id) && self.vuln_type == EventKind::CrawlComplete
  }

  /// The ordered URL list from completion evidence, if present.
  ///
  /// Non-string entries are skipped rather than failing the whole list.
  pub fn sitemap(&self) -> Option<Vec<String>> {
    let urls = self.evidence.get("sitemap")?.as_array()?;
    Some(
      urls
        .iter()
        .filter_map(|url| url.as_str().map(str::to_owned))
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn completion_sentinel_parses_to_crawl_complete() {
    let envelope: EventEnvelope = serde_json::from_str(
      r#"{"id":"abc123","vuln_type":"CRAWL_COMPLETE","evidence":{"sitemap":["https://a","https://b"]}}"#,
    )
    .unwrap();

    assert_eq!(envelope.vuln_type, EventKind::CrawlComplete);
    assert_eq!(
      envelope.sitemap().unwrap(),
      vec!["https://a".to_string(), "https://b".to_string()]
    );
  }

  #[test]
  fn unknown_markers_are_carried_verbatim() {
    let envelope: EventEnvelope =
      serde_json::from_str(r#"{"vuln_type":"DEFAULT_CREDS","evidence":{}}"#).unwrap();
    assert_eq!(
      envelope.vuln_type,
      EventKind::Finding("DEFAULT_CREDS".to_string())
    );
    assert!(envelope.id.is_none());
    assert!(envelope.sitemap().is_none());
  }

  #[test]
  fn unmodeled_keys_pass_through() {
    let json = r#"{"vuln_type":"XSS","evidence":{},"target":"https://a","timestamp":1712000000}"#;
    let envelope: EventEnvelope = serde_json::from_str(json).unwrap();
    assert_eq!(envelope.extra["target"], "https://a");

    let back = serde_json::to_value(&envelope).unwrap();
    assert_eq!(back["timestamp"], 1712000000);
  }

  #[test]
  fn completion_requires_matching_id_and_kind() {
    let envelope: EventEnvelope = serde_json::from_str(
      r#"{"id":"aa","vuln_type":"CRAWL_COMPLETE","evidence":{"sitemap":[]}}"#,
    )
    .unwrap();

    let ours: CorrelationId = serde_json::from_str("\"aa\"").unwrap();
    let theirs: CorrelationId = serde_json::from_str("\"bb\"").unwrap();
    assert!(envelope.is_completion_of(&ours));
    assert!(!envelope.is_completion_of(&theirs));
  }

  #[test]
  fn sitemap_skips_non_string_entries() {
    let envelope: EventEnvelope = serde_json::from_str(
      r#"{"vuln_type":"CRAWL_COMPLETE","evidence":{"sitemap":["https://a",42,null]}}"#,
    )
    .unwrap();
    assert_eq!(envelope.sitemap().unwrap(), vec!["https://a".to_string()]);
  }
}
