//! Operation dispatch.
//!
//! The [`Dispatcher`] owns an [`Invoker`] and the operation catalog. For each
//! call it picks one of two paths based on the operation's [`DispatchKind`]:
//!
//! - no-standard-input operations are sent with a copy of their arguments,
//!   with no source resolution at all;
//! - standard operations treat their arguments as a source handle. A concrete
//!   source is sent once; a `filter` fans out to one call per matched file,
//!   run concurrently, and fans back in to a map keyed by file name.

use docpipe_config::{Deps, DispatchKind, OperationCatalog};
use docpipe_host_http::{Invoker, Request};
use docpipe_wildcard::{Accumulator, FileRef, ResolvedReference, resolve};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::error::DispatchError;
use crate::preview::unresolved_source;
use crate::result::{DispatchOutput, NamedResultMap};

/// Dispatches operations to a remote invoker.
pub struct Dispatcher<I> {
  invoker: I,
  catalog: OperationCatalog,
}

impl<I: Invoker> Dispatcher<I> {
  pub fn new(invoker: I, catalog: OperationCatalog) -> Self {
    Self { invoker, catalog }
  }

  pub fn invoker(&self) -> &I {
    &self.invoker
  }

  pub fn invoker_mut(&mut self) -> &mut I {
    &mut self.invoker
  }

  pub fn catalog(&self) -> &OperationCatalog {
    &self.catalog
  }

  /// Dispatch one operation.
  ///
  /// Either the complete output is returned or an error; per-file results are
  /// never returned partially. If any per-file call fails, the first failure
  /// is returned and the other results are dropped.
  #[instrument(name = "dispatch", skip(self, acc, args, deps), fields(operation = %operation))]
  pub async fn dispatch(
    &self,
    operation: &str,
    acc: &Accumulator,
    args: &Value,
    deps: &Deps,
  ) -> Result<DispatchOutput, DispatchError> {
    let kind = self
      .catalog
      .kind(operation)
      .ok_or_else(|| DispatchError::UnknownOperation {
        operation: operation.to_string(),
      })?;
    info!(kind = ?kind, "dispatch_started");

    let result = match kind {
      DispatchKind::NoStandardInput => self.dispatch_direct(operation, args).await,
      DispatchKind::Standard => self.dispatch_standard(operation, acc, args, deps).await,
    };

    if let Err(e) = &result {
      error!(error = %e, "dispatch_failed");
    }

    result
  }

  /// Send the arguments as-is.
  async fn dispatch_direct(
    &self,
    operation: &str,
    args: &Value,
  ) -> Result<DispatchOutput, DispatchError> {
    let request = match args {
      Value::Object(map) => map.clone(),
      Value::Null => Request::new(),
      other => {
        return Err(DispatchError::InvalidArgs {
          operation: operation.to_string(),
          value: other.clone(),
        });
      }
    };

    let output = self.invoker.invoke(operation, request).await?;
    Ok(DispatchOutput::Single(output))
  }

  /// Resolve the arguments as a source handle, then send once or fan out.
  async fn dispatch_standard(
    &self,
    operation: &str,
    acc: &Accumulator,
    args: &Value,
    deps: &Deps,
  ) -> Result<DispatchOutput, DispatchError> {
    let Some(resolved) = resolve(acc, deps, args) else {
      return Err(unresolved_source(operation, args));
    };

    // resolve only succeeds for objects
    let base = args.as_object().cloned().unwrap_or_default();

    match resolved {
      ResolvedReference::Files(files) => {
        let named = self.fan_out(operation, &base, &files).await?;
        Ok(DispatchOutput::PerFile(named))
      }
      concrete => {
        debug!(source = %concrete.to_value(), "concrete source");
        let output = self.invoker.invoke(operation, base).await?;
        Ok(DispatchOutput::Single(output))
      }
    }
  }

  /// One concurrent call per file; results keyed by file name.
  ///
  /// Files sharing a name overwrite earlier entries.
  async fn fan_out(
    &self,
    operation: &str,
    base: &Request,
    files: &[FileRef],
  ) -> Result<NamedResultMap, DispatchError> {
    info!(files = files.len(), "fan_out_started");

    let calls = files.iter().map(|file| {
      let mut request = base.clone();
      request.insert(
        "reference".to_string(),
        Value::String(file.reference.clone()),
      );
      self.invoker.invoke(operation, request)
    });

    let results = futures::future::try_join_all(calls).await?;

    let mut named = NamedResultMap::new();
    for (file, result) in files.iter().zip(results) {
      named.insert(file.name.clone(), result);
    }

    info!(results = named.len(), "fan_out_completed");
    Ok(named)
  }
}
