//! Dispatch error types.

use docpipe_host_http::InvokeError;

/// Errors that can occur while dispatching a task.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
  /// The operation is not in the catalog.
  #[error("unknown operation '{operation}'")]
  UnknownOperation { operation: String },

  /// The declared source is not an object.
  #[error("source for '{operation}' did not resolve to an object: {value}")]
  SourceNotObject {
    operation: String,
    value: serde_json::Value,
  },

  /// The declared source is an object of unrecognized shape.
  #[error("source for '{operation}' resolved to an object of unrecognized shape: {value}")]
  UnrecognizedSource {
    operation: String,
    value: serde_json::Value,
  },

  /// Arguments of a no-standard-input operation are not an object.
  #[error("arguments for '{operation}' must be an object: {value}")]
  InvalidArgs {
    operation: String,
    value: serde_json::Value,
  },

  /// A task label was used twice in one pipeline.
  #[error("duplicate task label '{label}'")]
  DuplicateLabel { label: String },

  /// The remote call failed.
  #[error(transparent)]
  Invoke(#[from] InvokeError),
}
