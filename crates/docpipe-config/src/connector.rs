use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default endpoint prefix of the remote API.
pub const DEFAULT_BASE_URL: &str = "https://api.idolondemand.com/1/api/sync/";

/// Default suffix appended after the service name.
pub const DEFAULT_POST_SUFFIX: &str = "/v1";

/// Settings for reaching the remote document-analysis API.
///
/// A request for service `s` is POSTed to `{base_url}{s}{post_suffix}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,

  #[serde(default = "default_post_suffix")]
  pub post_suffix: String,

  /// Optional HTTP(S) proxy for all requests.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub proxy: Option<String>,

  /// Extra operation names added to the built-in catalog.
  #[serde(default)]
  pub operations: OperationOverrides,
}

/// Additional operation names, by dispatch kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationOverrides {
  #[serde(default)]
  pub standard: Vec<String>,
  #[serde(default)]
  pub no_standard_input: Vec<String>,
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_post_suffix() -> String {
  DEFAULT_POST_SUFFIX.to_string()
}

impl ConnectorConfig {
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }
}

impl Default for ConnectorConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      post_suffix: default_post_suffix(),
      proxy: None,
      operations: OperationOverrides::default(),
    }
  }
}
