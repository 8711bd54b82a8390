use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::SessionError;

/// Durable storage for checkpoint payloads, one per session.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
  /// The latest saved payload, or `None` if the session was never saved.
  async fn load(&self, session: &str) -> Result<Option<String>, SessionError>;

  /// Replace the saved payload.
  async fn save(&self, session: &str, payload: &str) -> Result<(), SessionError>;

  /// Forget the session. Deleting an unknown session is not an error.
  async fn delete(&self, session: &str) -> Result<(), SessionError>;
}

/// In-memory checkpoint store.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
  payloads: RwLock<HashMap<String, String>>,
}

impl MemoryCheckpointStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
  async fn load(&self, session: &str) -> Result<Option<String>, SessionError> {
    Ok(self.payloads.read().await.get(session).cloned())
  }

  async fn save(&self, session: &str, payload: &str) -> Result<(), SessionError> {
    self
      .payloads
      .write()
      .await
      .insert(session.to_string(), payload.to_string());
    Ok(())
  }

  async fn delete(&self, session: &str) -> Result<(), SessionError> {
    self.payloads.write().await.remove(session);
    Ok(())
  }
}
