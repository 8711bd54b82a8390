//! Execution events and notifiers for observability.
//!
//! Events are emitted during a pipeline run so consumers can observe
//! progress, persist outcomes, stream them, etc.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
  PipelineStarted {
    execution_id: String,
    pipeline: String,
  },

  TaskStarted {
    execution_id: String,
    label: String,
    operation: String,
  },

  TaskCompleted {
    execution_id: String,
    label: String,
    data: serde_json::Value,
  },

  TaskFailed {
    execution_id: String,
    label: String,
    error: String,
  },

  PipelineCompleted { execution_id: String },

  PipelineFailed { execution_id: String, error: String },
}

/// Trait for receiving execution events.
pub trait ExecutionNotifier: Send + Sync {
  fn notify(&self, event: ExecutionEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// Sends events to an unbounded channel.
///
/// Event volume is one per task start/finish, so the channel stays small.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
