use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// An opaque random token linking a broadcast task to its completion event.
///
/// 16 bytes from the OS entropy source, hex encoded. The token is only ever
/// compared for equality; nothing parses its content. A run owns the token it
/// generated and never reuses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
  /// Entropy drawn per token.
  pub const BYTE_LEN: usize = 16;

  /// Generate a fresh token from the OS entropy source.
  ///
  /// Fails only when the entropy source itself is unavailable, which callers
  /// should treat as fatal.
  pub fn generate() -> Result<Self, TaskError> {
    let mut bytes = [0u8; Self::BYTE_LEN];
    OsRng
      .try_fill_bytes(&mut bytes)
      .map_err(|source| TaskError::Entropy { source })?;
    Ok(Self(hex::encode(bytes)))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CorrelationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn generates_fixed_length_hex() {
    let id = CorrelationId::generate().unwrap();
    assert_eq!(id.as_str().len(), CorrelationId::BYTE_LEN * 2);
    assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn ten_thousand_draws_do_not_collide() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
      let id = CorrelationId::generate().unwrap();
      assert!(seen.insert(id), "correlation id collision");
    }
  }

  #[test]
  fn serializes_as_bare_string() {
    let id = CorrelationId::generate().unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_str()));

    let back: CorrelationId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
  }
}
