//! Source preview.
//!
//! Shows what a task would be dispatched with, given the outcomes recorded so
//! far, without making any remote call.

use docpipe_config::{DispatchKind, OperationCatalog, TaskDef};
use docpipe_wildcard::{Accumulator, ResolvedReference, resolve};
use serde_json::Value;

use crate::error::DispatchError;

/// What a task's input looks like before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePreview {
  /// The operation takes no standard input; these arguments are sent as-is.
  Bypassed(Value),
  /// The arguments resolved to a concrete source or a file list.
  Resolved(ResolvedReference),
}

/// Preview the input of `task` against `acc`.
///
/// Fails the same way dispatch would for unknown operations and sources that
/// do not resolve.
pub fn preview_source(
  catalog: &OperationCatalog,
  acc: &Accumulator,
  task: &TaskDef,
) -> Result<SourcePreview, DispatchError> {
  let kind = catalog
    .kind(&task.operation)
    .ok_or_else(|| DispatchError::UnknownOperation {
      operation: task.operation.clone(),
    })?;

  match kind {
    DispatchKind::NoStandardInput => match &task.args {
      Value::Object(_) => Ok(SourcePreview::Bypassed(task.args.clone())),
      Value::Null => Ok(SourcePreview::Bypassed(Value::Object(Default::default()))),
      other => Err(DispatchError::InvalidArgs {
        operation: task.operation.clone(),
        value: other.clone(),
      }),
    },
    DispatchKind::Standard => resolve(acc, &task.deps, &task.args)
      .map(SourcePreview::Resolved)
      .ok_or_else(|| unresolved_source(&task.operation, &task.args)),
  }
}

/// The error for a source that `resolve` rejected.
pub(crate) fn unresolved_source(operation: &str, args: &Value) -> DispatchError {
  if args.is_object() {
    DispatchError::UnrecognizedSource {
      operation: operation.to_string(),
      value: args.clone(),
    }
  } else {
    DispatchError::SourceNotObject {
      operation: operation.to_string(),
      value: args.clone(),
    }
  }
}
