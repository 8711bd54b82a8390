use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse configuration: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("operation '{name}' is declared as both standard and no-standard-input")]
  ConflictingOperation { name: String },

  #[error("task '{label}' has non-string dependency '{input}'")]
  InvalidDependency { label: String, input: String },
}
