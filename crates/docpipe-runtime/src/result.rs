//! Dispatch and pipeline result types.

use serde::{Deserialize, Serialize};

use docpipe_wildcard::Accumulator;

/// Per-file results keyed by file name.
pub type NamedResultMap = serde_json::Map<String, serde_json::Value>;

/// Output of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutput {
  /// The single response of a one-shot call.
  Single(serde_json::Value),
  /// One response per matched file.
  PerFile(NamedResultMap),
}

impl DispatchOutput {
  pub fn into_value(self) -> serde_json::Value {
    match self {
      Self::Single(value) => value,
      Self::PerFile(map) => serde_json::Value::Object(map),
    }
  }
}

/// Result of a complete pipeline run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
  /// Unique execution ID.
  pub execution_id: String,
  /// Outcome of every task, keyed by label.
  pub acc: Accumulator,
  /// Number of tasks that recorded an error.
  pub failed: usize,
  /// Labels of the tasks this run executed, in execution order.
  #[serde(default)]
  pub order: Vec<String>,
}

impl RunResult {
  /// Every outcome as a JSON object, in execution order.
  ///
  /// Outcomes that were already in the accumulator before the run come
  /// last, sorted by label.
  pub fn ordered_outcomes(&self) -> serde_json::Map<String, serde_json::Value> {
    let mut carried: Vec<&String> = self
      .acc
      .keys()
      .filter(|label| !self.order.contains(label))
      .collect();
    carried.sort();

    self
      .order
      .iter()
      .chain(carried)
      .filter_map(|label| {
        let outcome = self.acc.get(label)?;
        let value = serde_json::to_value(outcome).unwrap_or(serde_json::Value::Null);
        Some((label.clone(), value))
      })
      .collect()
  }
}
