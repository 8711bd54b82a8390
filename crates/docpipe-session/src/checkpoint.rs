//! Checkpoint payload.
//!
//! ```json
//! { "logActions": [ { "op": "addKey", "key": "k1" }, { "op": "deleteKey" } ], "key": "k1" }
//! ```
//!
//! `key` is present only while a key is set.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// A recorded key change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum LogAction {
  #[serde(rename = "addKey")]
  AddKey { key: String },
  #[serde(rename = "deleteKey")]
  DeleteKey,
}

/// Durable snapshot of a key session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
  #[serde(rename = "logActions")]
  pub log_actions: Vec<LogAction>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
}

impl Checkpoint {
  pub fn encode(&self) -> Result<String, SessionError> {
    serde_json::to_string(self).map_err(SessionError::Encode)
  }

  /// Decode a payload. Unknown log actions make the whole payload corrupt.
  pub fn decode(payload: &str) -> Result<Self, SessionError> {
    serde_json::from_str(payload).map_err(|e| SessionError::CorruptCheckpoint {
      message: e.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_encode_with_key() {
    let checkpoint = Checkpoint {
      log_actions: vec![LogAction::AddKey {
        key: "k1".to_string(),
      }],
      key: Some("k1".to_string()),
    };

    let value: serde_json::Value = serde_json::from_str(&checkpoint.encode().unwrap()).unwrap();

    assert_eq!(
      value,
      json!({"logActions": [{"op": "addKey", "key": "k1"}], "key": "k1"})
    );
  }

  #[test]
  fn test_encode_without_key_omits_field() {
    let checkpoint = Checkpoint {
      log_actions: vec![LogAction::DeleteKey],
      key: None,
    };

    let value: serde_json::Value = serde_json::from_str(&checkpoint.encode().unwrap()).unwrap();

    assert_eq!(value, json!({"logActions": [{"op": "deleteKey"}]}));
  }

  #[test]
  fn test_decode_unknown_action_is_fatal() {
    let err = Checkpoint::decode(r#"{"logActions": [{"op": "rotateKey"}]}"#).unwrap_err();
    assert!(matches!(err, SessionError::CorruptCheckpoint { .. }));
    assert!(err.is_fatal());
  }

  #[test]
  fn test_decode_requires_log_actions() {
    let err = Checkpoint::decode(r#"{"key": "k1"}"#).unwrap_err();
    assert!(err.is_fatal());
  }

  #[test]
  fn test_decode_rejects_garbage() {
    assert!(Checkpoint::decode("not json").unwrap_err().is_fatal());
  }
}
