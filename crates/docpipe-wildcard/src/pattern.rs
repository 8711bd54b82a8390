//! Wildcard path expressions.
//!
//! `*` matches any run of characters, `/` and newlines included. Everything
//! else is literal and the whole candidate must match.

use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// A compiled, anchored wildcard expression.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
  source: String,
  regex: Regex,
}

impl WildcardPattern {
  /// Compile a single wildcard expression.
  pub fn new(pattern: &str) -> Result<Self, regex::Error> {
    let body = pattern
      .split('*')
      .map(regex::escape)
      .collect::<Vec<_>>()
      .join(".*");
    let regex = Regex::new(&format!("(?s)^{}$", body))?;

    Ok(Self {
      source: pattern.to_string(),
      regex,
    })
  }

  /// The expression this pattern was compiled from.
  pub fn as_str(&self) -> &str {
    &self.source
  }

  /// Whether the whole candidate matches.
  pub fn matches(&self, candidate: &str) -> bool {
    self.regex.is_match(candidate)
  }
}

/// Compile a list of wildcard expressions.
///
/// Elements that are not strings are skipped, as are expressions too large
/// for the regex engine.
pub fn compile(patterns: &[Value]) -> Vec<WildcardPattern> {
  patterns
    .iter()
    .filter_map(Value::as_str)
    .filter_map(|pattern| match WildcardPattern::new(pattern) {
      Ok(compiled) => Some(compiled),
      Err(e) => {
        warn!(pattern = %pattern, error = %e, "skipping uncompilable pattern");
        None
      }
    })
    .collect()
}

/// True if `candidate` is a string fully matched by at least one pattern.
pub fn matches_any(patterns: &[WildcardPattern], candidate: &Value) -> bool {
  match candidate.as_str() {
    Some(s) => patterns.iter().any(|p| p.matches(s)),
    None => false,
  }
}
