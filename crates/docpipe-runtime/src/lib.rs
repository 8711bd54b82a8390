//! Docpipe Runtime
//!
//! This crate turns task declarations into remote calls.
//!
//! The lowest-level primitive is the [`Dispatcher`]: given an operation name,
//! its arguments and the results of earlier tasks, it resolves the task's
//! source and invokes the remote operation once, or once per matched file in
//! parallel. [`Pipeline`] drives a whole [`PipelineDef`](docpipe_config::PipelineDef)
//! through the dispatcher, building the accumulator as it goes.

mod dispatcher;
mod error;
mod events;
mod pipeline;
mod preview;
mod result;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use pipeline::Pipeline;
pub use preview::{SourcePreview, preview_source};
pub use result::{DispatchOutput, NamedResultMap, RunResult};
