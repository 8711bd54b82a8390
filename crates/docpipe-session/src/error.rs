use thiserror::Error;

/// Errors from the key session and its checkpoint storage.
#[derive(Debug, Error)]
pub enum SessionError {
  /// The checkpoint payload is not a valid checkpoint. Unrecoverable.
  #[error("corrupt checkpoint: {message}")]
  CorruptCheckpoint { message: String },

  /// The checkpoint could not be serialized.
  #[error("failed to encode checkpoint: {0}")]
  Encode(#[source] serde_json::Error),

  /// The session name cannot be used as a storage key.
  #[error("invalid session name '{0}'")]
  InvalidSessionName(String),

  /// Checkpoint storage failed.
  #[error("checkpoint store io error: {0}")]
  Io(#[from] std::io::Error),
}

impl SessionError {
  /// True when the durable state itself is invalid and the session must not
  /// continue.
  pub fn is_fatal(&self) -> bool {
    matches!(self, Self::CorruptCheckpoint { .. })
  }
}
