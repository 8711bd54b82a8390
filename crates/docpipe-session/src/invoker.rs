//! Key-stamping invoker.

use async_trait::async_trait;
use docpipe_host_http::{InvokeError, Invoker, Request};
use tracing::{debug, warn};

use crate::checkpoint::{Checkpoint, LogAction};
use crate::error::SessionError;
use crate::lifecycle::Transactional;

/// Wraps an [`Invoker`] and stamps the session's API key into each request.
///
/// Owns the key, the rollback slot and the pending log. Mutation goes
/// through `&mut self`, so a dispatch in flight always sees one key.
pub struct KeyedInvoker<I> {
  inner: I,
  key: Option<String>,
  /// Key as it was before the first change of the current unit of work.
  rollback: Option<Option<String>>,
  log: Vec<LogAction>,
}

impl<I> KeyedInvoker<I> {
  /// Create an invoker with no key and an empty log.
  pub fn new(inner: I) -> Self {
    Self {
      inner,
      key: None,
      rollback: None,
      log: Vec::new(),
    }
  }

  /// Set a new key. Visible immediately, durable after commit.
  pub fn add_key(&mut self, key: impl Into<String>) {
    let key = key.into();
    self.remember_rollback();
    self.key = Some(key.clone());
    self.log.push(LogAction::AddKey { key });
    debug!("api key replaced");
  }

  /// Clear the key. Visible immediately, durable after commit.
  pub fn delete_key(&mut self) {
    self.remember_rollback();
    self.key = None;
    self.log.push(LogAction::DeleteKey);
    debug!("api key deleted");
  }

  /// The current key. An empty key counts as no key.
  pub fn key(&self) -> Option<&str> {
    self.key.as_deref().filter(|key| !key.is_empty())
  }

  /// Key changes recorded since the last `init`, `begin` or `abort`.
  pub fn pending_actions(&self) -> &[LogAction] {
    &self.log
  }

  pub fn inner(&self) -> &I {
    &self.inner
  }

  fn remember_rollback(&mut self) {
    if self.rollback.is_none() {
      self.rollback = Some(self.key.clone());
    }
  }

  fn replay_log(&mut self) {
    for action in &self.log {
      match action {
        LogAction::AddKey { key } => self.key = Some(key.clone()),
        LogAction::DeleteKey => self.key = None,
      }
    }
    self.rollback = None;
  }
}

impl<I> Transactional for KeyedInvoker<I> {
  fn init(&mut self) {
    self.key = None;
    self.rollback = None;
    self.log.clear();
  }

  fn resume(&mut self, checkpoint: Option<&str>) -> Result<(), SessionError> {
    let checkpoint = match checkpoint {
      Some(payload) => Checkpoint::decode(payload)?,
      None => Checkpoint::default(),
    };

    self.key = checkpoint.key;
    self.log = checkpoint.log_actions;
    self.replay_log();

    debug!(has_key = self.key.is_some(), "session resumed");
    Ok(())
  }

  fn begin(&mut self) {
    self.log.clear();
    self.rollback = None;
  }

  fn prepare(&self) -> Result<String, SessionError> {
    Checkpoint {
      log_actions: self.log.clone(),
      key: self.key.clone(),
    }
    .encode()
  }

  fn commit(&mut self) {
    self.replay_log();
  }

  fn abort(&mut self) {
    self.log.clear();
    if let Some(previous) = self.rollback.take() {
      self.key = previous;
    }
  }
}

#[async_trait]
impl<I: Invoker> Invoker for KeyedInvoker<I> {
  async fn invoke(
    &self,
    service: &str,
    mut request: Request,
  ) -> Result<serde_json::Value, InvokeError> {
    let Some(key) = self.key() else {
      warn!(service = %service, "invoke rejected, no api key set");
      return Err(InvokeError::NoApiKey);
    };

    request.insert(
      "apikey".to_string(),
      serde_json::Value::String(key.to_string()),
    );
    self.inner.invoke(service, request).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn session() -> KeyedInvoker<()> {
    KeyedInvoker::new(())
  }

  #[test]
  fn test_add_key_visible_immediately() {
    let mut s = session();
    s.add_key("k1");
    assert_eq!(s.key(), Some("k1"));
    assert_eq!(
      s.pending_actions(),
      &[LogAction::AddKey {
        key: "k1".to_string()
      }]
    );
  }

  #[test]
  fn test_prepare_payload() {
    let mut s = session();
    s.add_key("k1");

    let payload: serde_json::Value = serde_json::from_str(&s.prepare().unwrap()).unwrap();

    assert_eq!(
      payload,
      json!({"logActions": [{"op": "addKey", "key": "k1"}], "key": "k1"})
    );
    // prepare does not mutate
    assert_eq!(s.pending_actions().len(), 1);
  }

  #[test]
  fn test_resume_from_prepared_checkpoint() {
    let mut s = session();
    s.add_key("k1");
    let payload = s.prepare().unwrap();

    let mut restarted = session();
    restarted.resume(Some(&payload)).unwrap();

    assert_eq!(restarted.key(), Some("k1"));
  }

  #[test]
  fn test_abort_restores_missing_key() {
    let mut s = session();
    s.add_key("k1");
    s.abort();
    assert_eq!(s.key(), None);
    assert!(s.pending_actions().is_empty());
  }

  #[test]
  fn test_abort_restores_key_from_before_unit() {
    let mut s = session();
    s.add_key("k0");
    s.commit();

    s.begin();
    s.add_key("k1");
    s.add_key("k2");
    s.delete_key();
    assert_eq!(s.key(), None);

    s.abort();
    assert_eq!(s.key(), Some("k0"));
  }

  #[test]
  fn test_abort_restores_key_set_before_begin() {
    let mut s = session();
    s.add_key("k1");

    s.begin();
    s.add_key("k2");
    s.abort();

    assert_eq!(s.key(), Some("k1"));
  }

  #[test]
  fn test_empty_key_is_no_key() {
    let mut s = session();
    s.add_key("");
    assert_eq!(s.key(), None);
  }

  #[test]
  fn test_commit_clears_rollback() {
    let mut s = session();
    s.begin();
    s.add_key("k1");
    s.commit();

    s.begin();
    s.abort();
    assert_eq!(s.key(), Some("k1"));
  }

  #[test]
  fn test_commit_replays_log() {
    let mut s = session();
    s.begin();
    s.add_key("k1");
    s.delete_key();
    s.add_key("k2");
    s.commit();
    assert_eq!(s.key(), Some("k2"));
  }

  #[test]
  fn test_begin_clears_log() {
    let mut s = session();
    s.add_key("k1");
    s.commit();
    s.begin();
    assert!(s.pending_actions().is_empty());
    assert_eq!(s.key(), Some("k1"));
  }

  #[test]
  fn test_delete_key_checkpoint_omits_key() {
    let mut s = session();
    s.add_key("k1");
    s.commit();
    s.begin();
    s.delete_key();

    let payload: serde_json::Value = serde_json::from_str(&s.prepare().unwrap()).unwrap();
    assert_eq!(payload, json!({"logActions": [{"op": "deleteKey"}]}));
  }

  #[test]
  fn test_init_clears_everything() {
    let mut s = session();
    s.add_key("k1");
    s.init();
    assert_eq!(s.key(), None);
    assert!(s.pending_actions().is_empty());
    s.abort();
    assert_eq!(s.key(), None);
  }

  #[test]
  fn test_resume_none_is_empty() {
    let mut s = session();
    s.add_key("stale");
    s.resume(None).unwrap();
    assert_eq!(s.key(), None);
  }

  #[test]
  fn test_resume_replays_delete_after_key() {
    let mut s = session();
    s.resume(Some(r#"{"logActions": [{"op": "deleteKey"}], "key": "k1"}"#))
      .unwrap();
    assert_eq!(s.key(), None);
  }

  #[test]
  fn test_resume_corrupt_checkpoint_is_fatal() {
    let mut s = session();
    let err = s
      .resume(Some(r#"{"logActions": [{"op": "addBindings"}]}"#))
      .unwrap_err();
    assert!(err.is_fatal());
  }
}
