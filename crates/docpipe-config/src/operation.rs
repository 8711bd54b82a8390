//! Operation catalog.
//!
//! Every remote operation name maps to a [`DispatchKind`], fixed when the
//! catalog is built. Operations that do not process a document bypass source
//! resolution entirely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::connector::OperationOverrides;
use crate::error::ConfigError;

/// How the dispatcher treats an operation's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
  /// Takes a file, text or url input; the arguments are a source handle.
  Standard,
  /// Index and account management; arguments are sent as-is.
  NoStandardInput,
}

/// Operations whose arguments are resolved as a source handle.
pub const STANDARD_OPERATIONS: &[&str] = &[
  "addtotextindex",
  "analyzesentiment",
  "categorizedocument",
  "detectfaces",
  "detectlanguage",
  "expandcontainer",
  "extractconcepts",
  "extractentities",
  "extracttext",
  "findrelatedconcepts",
  "findsimilar",
  "highlighttext",
  "ocrdocument",
  "querytextindex",
  "recognizebarcodes",
  "recognizeimages",
  "storeobject",
  "tokenizetext",
  "viewdocument",
];

/// Operations that take no file, text or url input.
pub const NO_STANDARD_INPUT_OPERATIONS: &[&str] = &[
  "createtextindex",
  "deletefromtextindex",
  "deletetextindex",
  "getcontent",
  "getparametricvalues",
  "indexstatus",
  "listindexes",
  "listresources",
  "retrieveindexfields",
];

/// Static mapping from operation name to dispatch kind.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationCatalog {
  kinds: HashMap<String, DispatchKind>,
}

impl OperationCatalog {
  /// Build a catalog from explicit name lists.
  pub fn new<S, N>(standard: S, no_standard_input: N) -> Result<Self, ConfigError>
  where
    S: IntoIterator,
    S::Item: Into<String>,
    N: IntoIterator,
    N::Item: Into<String>,
  {
    let mut kinds: HashMap<String, DispatchKind> = standard
      .into_iter()
      .map(|name| (name.into(), DispatchKind::Standard))
      .collect();

    for name in no_standard_input {
      let name = name.into();
      if kinds.get(&name) == Some(&DispatchKind::Standard) {
        return Err(ConfigError::ConflictingOperation { name });
      }
      kinds.insert(name, DispatchKind::NoStandardInput);
    }

    Ok(Self { kinds })
  }

  /// Extend the built-in catalog with extra names from configuration.
  pub fn with_overrides(overrides: &OperationOverrides) -> Result<Self, ConfigError> {
    let standard = STANDARD_OPERATIONS
      .iter()
      .map(|s| s.to_string())
      .chain(overrides.standard.iter().cloned());
    let no_input = NO_STANDARD_INPUT_OPERATIONS
      .iter()
      .map(|s| s.to_string())
      .chain(overrides.no_standard_input.iter().cloned());
    Self::new(standard, no_input)
  }

  /// Dispatch kind for an operation, or `None` if it is not recognized.
  pub fn kind(&self, operation: &str) -> Option<DispatchKind> {
    self.kinds.get(operation).copied()
  }

  pub fn len(&self) -> usize {
    self.kinds.len()
  }

  pub fn is_empty(&self) -> bool {
    self.kinds.is_empty()
  }
}

impl Default for OperationCatalog {
  fn default() -> Self {
    let mut kinds = HashMap::new();
    for name in STANDARD_OPERATIONS {
      kinds.insert(name.to_string(), DispatchKind::Standard);
    }
    for name in NO_STANDARD_INPUT_OPERATIONS {
      kinds.insert(name.to_string(), DispatchKind::NoStandardInput);
    }
    Self { kinds }
  }
}
