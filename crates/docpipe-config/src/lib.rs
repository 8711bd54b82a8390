//! Docpipe Config
//!
//! This crate contains the serializable configuration types for docpipe.
//! These types describe pipelines before they are run and the connector
//! settings used to reach the remote document-analysis API.
//!
//! Configuration can be loaded from:
//! - JSON pipeline files (via CLI with `docpipe run pipeline.json`)
//! - JSON connector files (via CLI with `--config connector.json`)
//!
//! The runtime takes these types, resolves each task's declared source
//! against earlier results, and dispatches remote calls.

mod connector;
mod error;
mod operation;
mod pipeline;

pub use connector::{ConnectorConfig, DEFAULT_BASE_URL, DEFAULT_POST_SUFFIX, OperationOverrides};
pub use error::ConfigError;
pub use operation::{DispatchKind, NO_STANDARD_INPUT_OPERATIONS, OperationCatalog, STANDARD_OPERATIONS};
pub use pipeline::{Deps, PipelineDef, TaskDef};
