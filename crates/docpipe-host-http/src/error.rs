use thiserror::Error;

/// Errors from a remote invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
  /// No API key is set; nothing was sent.
  #[error("no API key")]
  NoApiKey,

  /// The endpoint URL could not be built.
  #[error("invalid endpoint url '{url}': {source}")]
  InvalidUrl {
    url: String,
    #[source]
    source: url::ParseError,
  },

  /// Network or protocol failure.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The remote API answered with a non-success status.
  #[error("service returned status {status}: {body}")]
  Status { status: u16, body: String },

  /// Failure reported by a non-HTTP invoker.
  #[error("remote call failed: {message}")]
  Remote { message: String },
}

impl InvokeError {
  pub fn remote(message: impl Into<String>) -> Self {
    Self::Remote {
      message: message.into(),
    }
  }
}
