//! Source handle resolution.

use docpipe_config::Deps;
use serde_json::Value;

use crate::extract::extract_refs;
use crate::pattern::compile;
use crate::types::{Accumulator, ResolvedReference, SourceHandle};

/// Resolve a declared source against earlier task results.
///
/// Concrete sources pass through unchanged. A `filter` always yields a
/// `Files` listing, possibly empty. Anything else resolves to `None`; callers
/// decide whether that is an error.
pub fn resolve(acc: &Accumulator, deps: &Deps, source: &Value) -> Option<ResolvedReference> {
  let resolved = match SourceHandle::parse(source)? {
    SourceHandle::Reference(reference) => ResolvedReference::Reference(reference),
    SourceHandle::Text(text) => ResolvedReference::Text(text),
    SourceHandle::Url(url) => ResolvedReference::Url(url),
    SourceHandle::Filter(patterns) => {
      let patterns = compile(&patterns);
      ResolvedReference::Files(extract_refs(&patterns, acc, deps))
    }
  };

  Some(resolved)
}
