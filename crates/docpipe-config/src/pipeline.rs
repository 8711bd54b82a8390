use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Logical input name -> label of an earlier task.
///
/// Backed by an insertion-ordered map, so matches from earlier entries are
/// always reported before matches from later ones.
pub type Deps = serde_json::Map<String, serde_json::Value>;

/// A single task declaration in a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
  /// Label under which this task's outcome is recorded.
  pub label: String,

  /// Remote operation name, e.g. "extracttext".
  #[serde(alias = "operationName")]
  pub operation: String,

  /// Static arguments. For standard-input operations this doubles as the
  /// source handle (`{reference}`, `{text}`, `{url}` or `{filter: [...]}`).
  #[serde(default = "empty_args")]
  pub args: serde_json::Value,

  /// Inputs read from earlier tasks.
  #[serde(default)]
  pub deps: Deps,
}

fn empty_args() -> serde_json::Value {
  serde_json::Value::Object(serde_json::Map::new())
}

impl TaskDef {
  /// Reject dependency values that are not task labels.
  pub fn validate(&self) -> Result<(), ConfigError> {
    for (input, label) in &self.deps {
      if !label.is_string() {
        return Err(ConfigError::InvalidDependency {
          label: self.label.clone(),
          input: input.clone(),
        });
      }
    }
    Ok(())
  }
}

/// A pipeline: an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDef {
  pub name: String,
  pub tasks: Vec<TaskDef>,
}

impl PipelineDef {
  /// Parse a pipeline from JSON text and validate every task.
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    let pipeline: PipelineDef = serde_json::from_str(content)?;
    for task in &pipeline.tasks {
      task.validate()?;
    }
    Ok(pipeline)
  }
}
