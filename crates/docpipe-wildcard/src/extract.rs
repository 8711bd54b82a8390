//! Reference extraction from earlier task results.

use docpipe_config::Deps;
use serde_json::Value;
use tracing::{debug, warn};

use crate::pattern::{WildcardPattern, matches_any};
use crate::types::{Accumulator, FileRef};

/// Collect every listed file, across all dependencies, whose name matches.
///
/// Dependencies are visited in declaration order and their matches are
/// concatenated. A dependency that is missing from `acc`, or whose data has no
/// `files` array, contributes nothing.
pub fn extract_refs(patterns: &[WildcardPattern], acc: &Accumulator, deps: &Deps) -> Vec<FileRef> {
  let mut result = Vec::new();

  for (input, label) in deps {
    let Some(label) = label.as_str() else {
      continue;
    };

    let Some(files) = acc.get(label).and_then(|outcome| outcome.files()) else {
      debug!(input = %input, label = %label, "dependency has no file listing");
      continue;
    };

    result.extend(
      files
        .iter()
        .filter(|entry| entry.is_object() && matches_any(patterns, &entry["name"]))
        .filter_map(|entry| to_file_ref(label, entry)),
    );
  }

  result
}

fn to_file_ref(label: &str, entry: &Value) -> Option<FileRef> {
  let name = entry["name"].as_str()?;
  match entry["reference"].as_str() {
    Some(reference) => Some(FileRef {
      name: name.to_string(),
      reference: reference.to_string(),
    }),
    None => {
      warn!(label = %label, name = %name, "matched file has no reference, skipping");
      None
    }
  }
}
