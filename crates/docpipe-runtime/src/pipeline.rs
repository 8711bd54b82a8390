//! Pipeline driver.
//!
//! Runs tasks in declaration order. Each task sees the outcomes of every task
//! before it. Task failures are recorded in the accumulator as `{error}` and
//! the run continues; later tasks depending on a failed task simply find no
//! file listing there.

use docpipe_config::PipelineDef;
use docpipe_host_http::Invoker;
use docpipe_wildcard::{Accumulator, TaskOutcome};
use tracing::{error, info, instrument, warn};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::result::RunResult;

/// Drives pipelines through a [`Dispatcher`].
pub struct Pipeline<I, N: ExecutionNotifier = NoopNotifier> {
  dispatcher: Dispatcher<I>,
  notifier: N,
}

impl<I: Invoker> Pipeline<I, NoopNotifier> {
  /// Create a pipeline driver that discards events.
  pub fn new(dispatcher: Dispatcher<I>) -> Self {
    Self::with_notifier(dispatcher, NoopNotifier)
  }
}

impl<I: Invoker, N: ExecutionNotifier> Pipeline<I, N> {
  pub fn with_notifier(dispatcher: Dispatcher<I>, notifier: N) -> Self {
    Self {
      dispatcher,
      notifier,
    }
  }

  pub fn dispatcher(&self) -> &Dispatcher<I> {
    &self.dispatcher
  }

  pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<I> {
    &mut self.dispatcher
  }

  /// Run every task of the pipeline starting from an empty accumulator.
  pub async fn run(&self, pipeline: &PipelineDef) -> Result<RunResult, DispatchError> {
    self.run_from(pipeline, Accumulator::new()).await
  }

  /// Run every task of the pipeline on top of existing outcomes.
  #[instrument(
    name = "pipeline_run",
    skip(self, pipeline, acc),
    fields(pipeline = %pipeline.name)
  )]
  pub async fn run_from(
    &self,
    pipeline: &PipelineDef,
    mut acc: Accumulator,
  ) -> Result<RunResult, DispatchError> {
    let execution_id = uuid::Uuid::new_v4().to_string();
    let mut failed = 0;
    let mut order = Vec::with_capacity(pipeline.tasks.len());

    info!(
      execution_id = %execution_id,
      tasks = pipeline.tasks.len(),
      "pipeline_started"
    );
    self.notifier.notify(ExecutionEvent::PipelineStarted {
      execution_id: execution_id.clone(),
      pipeline: pipeline.name.clone(),
    });

    for task in &pipeline.tasks {
      if acc.contains_key(&task.label) {
        let e = DispatchError::DuplicateLabel {
          label: task.label.clone(),
        };
        error!(execution_id = %execution_id, error = %e, "pipeline_failed");
        self.notifier.notify(ExecutionEvent::PipelineFailed {
          execution_id: execution_id.clone(),
          error: e.to_string(),
        });
        return Err(e);
      }

      info!(
        execution_id = %execution_id,
        label = %task.label,
        operation = %task.operation,
        "task_started"
      );
      self.notifier.notify(ExecutionEvent::TaskStarted {
        execution_id: execution_id.clone(),
        label: task.label.clone(),
        operation: task.operation.clone(),
      });

      let outcome = match self
        .dispatcher
        .dispatch(&task.operation, &acc, &task.args, &task.deps)
        .await
      {
        Ok(output) => {
          let data = output.into_value();
          info!(execution_id = %execution_id, label = %task.label, "task_completed");
          self.notifier.notify(ExecutionEvent::TaskCompleted {
            execution_id: execution_id.clone(),
            label: task.label.clone(),
            data: data.clone(),
          });
          TaskOutcome::success(data)
        }
        Err(e) => {
          failed += 1;
          warn!(
            execution_id = %execution_id,
            label = %task.label,
            error = %e,
            "task_failed"
          );
          self.notifier.notify(ExecutionEvent::TaskFailed {
            execution_id: execution_id.clone(),
            label: task.label.clone(),
            error: e.to_string(),
          });
          TaskOutcome::failure(e.to_string())
        }
      };

      acc.insert(task.label.clone(), outcome);
      order.push(task.label.clone());
    }

    info!(execution_id = %execution_id, failed, "pipeline_completed");
    self.notifier.notify(ExecutionEvent::PipelineCompleted {
      execution_id: execution_id.clone(),
    });

    Ok(RunResult {
      execution_id,
      acc,
      failed,
      order,
    })
  }
}
