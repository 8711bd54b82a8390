use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a completed task, as recorded in the accumulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
  #[serde(default, alias = "err", skip_serializing_if = "Option::is_none")]
  pub error: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>,
}

impl TaskOutcome {
  pub fn success(data: Value) -> Self {
    Self {
      error: None,
      data: Some(data),
    }
  }

  pub fn failure(error: impl Into<String>) -> Self {
    Self {
      error: Some(Value::String(error.into())),
      data: None,
    }
  }

  /// The `data.files` listing, if this task produced one.
  pub fn files(&self) -> Option<&Vec<Value>> {
    self.data.as_ref()?.get("files")?.as_array()
  }
}

/// Completed task outcomes keyed by task label.
///
/// Owned by the pipeline driver; resolution only reads it.
pub type Accumulator = HashMap<String, TaskOutcome>;

/// One entry of an exploded-container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
  pub name: String,
  pub reference: String,
}

/// How a task declares its input.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceHandle {
  Reference(String),
  Text(String),
  Url(String),
  /// Raw pattern list; non-string entries are tolerated and ignored later.
  Filter(Vec<Value>),
}

impl SourceHandle {
  /// Decode a loosely-typed source object.
  ///
  /// A string `reference`, `text` or `url` wins over `filter`. Returns `None`
  /// for non-objects and unrecognized shapes.
  pub fn parse(source: &Value) -> Option<Self> {
    let obj = source.as_object()?;

    if let Some(reference) = obj.get("reference").and_then(Value::as_str) {
      return Some(Self::Reference(reference.to_string()));
    }
    if let Some(text) = obj.get("text").and_then(Value::as_str) {
      return Some(Self::Text(text.to_string()));
    }
    if let Some(url) = obj.get("url").and_then(Value::as_str) {
      return Some(Self::Url(url.to_string()));
    }

    obj
      .get("filter")
      .and_then(Value::as_array)
      .map(|patterns| Self::Filter(patterns.clone()))
  }
}

/// Result of resolving a [`SourceHandle`].
///
/// Serializes to the same single-key shape the handle was declared with,
/// e.g. `{"reference": "r1"}` or `{"files": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedReference {
  Url(String),
  Reference(String),
  Text(String),
  Files(Vec<FileRef>),
}

impl ResolvedReference {
  /// True for a single concrete input (`reference`, `text` or `url`).
  pub fn is_concrete(&self) -> bool {
    !matches!(self, Self::Files(_))
  }

  pub fn to_value(&self) -> Value {
    serde_json::to_value(self).unwrap_or(Value::Null)
  }
}
