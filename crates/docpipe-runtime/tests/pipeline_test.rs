//! Integration tests for Pipeline runs over a fake remote API.

use async_trait::async_trait;
use docpipe_config::{OperationCatalog, PipelineDef};
use docpipe_host_http::{InvokeError, Invoker, Request};
use docpipe_runtime::{ChannelNotifier, DispatchError, Dispatcher, ExecutionEvent, Pipeline};
use docpipe_session::KeyedInvoker;
use docpipe_wildcard::{Accumulator, TaskOutcome};
use serde_json::{Value, json};
use tokio::sync::mpsc;

/// Fake API: `expandcontainer` explodes a zip into three files, every other
/// operation echoes its reference, and references starting with "bad" fail.
struct ArchiveApi;

#[async_trait]
impl Invoker for ArchiveApi {
  async fn invoke(&self, service: &str, request: Request) -> Result<Value, InvokeError> {
    if service == "expandcontainer" {
      return Ok(json!({
        "files": [
          {"name": "scan-1.png", "reference": "ref-scan-1"},
          {"name": "scan-2.png", "reference": "bad-scan-2"},
          {"name": "notes.txt", "reference": "ref-notes"}
        ]
      }));
    }

    let reference = request.get("reference").cloned().unwrap_or(Value::Null);
    if reference.as_str().is_some_and(|r| r.starts_with("bad")) {
      return Err(InvokeError::Status {
        status: 400,
        body: "unreadable".to_string(),
      });
    }
    Ok(json!({ "service": service, "reference": reference }))
  }
}

fn pipeline(value: Value) -> PipelineDef {
  PipelineDef::from_json(&value.to_string()).unwrap()
}

fn driver() -> Pipeline<ArchiveApi> {
  Pipeline::new(Dispatcher::new(ArchiveApi, OperationCatalog::default()))
}

#[tokio::test]
async fn test_chained_stages() {
  let def = pipeline(json!({
    "name": "archive",
    "tasks": [
      { "label": "expand", "operation": "expandcontainer", "args": { "url": "http://x/a.zip" } },
      {
        "label": "text",
        "operation": "extracttext",
        "args": { "filter": ["*.txt"] },
        "deps": { "archive": "expand" }
      },
      { "label": "indexes", "operation": "listindexes" }
    ]
  }));

  let result = driver().run(&def).await.unwrap();

  assert_eq!(result.failed, 0);
  assert_eq!(result.acc.len(), 3);
  assert_eq!(
    result.acc["text"].data,
    Some(json!({ "notes.txt": { "service": "extracttext", "reference": "ref-notes" } }))
  );
  assert_eq!(
    result.acc["indexes"].data,
    Some(json!({ "service": "listindexes", "reference": null }))
  );
}

#[tokio::test]
async fn test_failed_fan_out_recorded_and_run_continues() {
  let def = pipeline(json!({
    "name": "archive",
    "tasks": [
      { "label": "expand", "operation": "expandcontainer", "args": { "url": "http://x/a.zip" } },
      {
        "label": "ocr",
        "operation": "ocrdocument",
        "args": { "filter": ["*.png"] },
        "deps": { "archive": "expand" }
      },
      {
        "label": "after_ocr",
        "operation": "extracttext",
        "args": { "filter": ["*"] },
        "deps": { "previous": "ocr" }
      }
    ]
  }));

  let result = driver().run(&def).await.unwrap();

  assert_eq!(result.failed, 1);
  let ocr = &result.acc["ocr"];
  assert!(ocr.data.is_none());
  assert!(
    ocr
      .error
      .as_ref()
      .and_then(Value::as_str)
      .is_some_and(|e| e.contains("400"))
  );
  // a failed task has no file listing, so the filter matches nothing
  assert_eq!(result.acc["after_ocr"].data, Some(json!({})));
}

#[tokio::test]
async fn test_resolution_errors_recorded() {
  let def = pipeline(json!({
    "name": "bad",
    "tasks": [
      { "label": "shapeless", "operation": "extracttext", "args": { "path": "/etc/hosts" } },
      { "label": "unknown", "operation": "teleport", "args": { "text": "x" } }
    ]
  }));

  let result = driver().run(&def).await.unwrap();

  assert_eq!(result.failed, 2);
  assert!(result.acc["shapeless"].error.is_some());
  assert!(result.acc["unknown"].error.is_some());
}

#[tokio::test]
async fn test_duplicate_label_fails_run() {
  let def = pipeline(json!({
    "name": "dup",
    "tasks": [
      { "label": "a", "operation": "detectlanguage", "args": { "text": "x" } },
      { "label": "a", "operation": "detectlanguage", "args": { "text": "y" } }
    ]
  }));

  let err = driver().run(&def).await.unwrap_err();

  assert!(matches!(err, DispatchError::DuplicateLabel { label } if label == "a"));
}

#[tokio::test]
async fn test_events_emitted_in_order() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let driver = Pipeline::with_notifier(
    Dispatcher::new(ArchiveApi, OperationCatalog::default()),
    ChannelNotifier::new(tx),
  );
  let def = pipeline(json!({
    "name": "events",
    "tasks": [
      { "label": "lang", "operation": "detectlanguage", "args": { "text": "bonjour" } },
      { "label": "bad", "operation": "extracttext", "args": 5 }
    ]
  }));

  let result = driver.run(&def).await.unwrap();
  drop(driver);

  let mut events = Vec::new();
  while let Some(event) = rx.recv().await {
    events.push(event);
  }

  assert_eq!(events.len(), 6);
  assert_eq!(
    events[0],
    ExecutionEvent::PipelineStarted {
      execution_id: result.execution_id.clone(),
      pipeline: "events".to_string(),
    }
  );
  assert!(matches!(&events[1], ExecutionEvent::TaskStarted { label, .. } if label == "lang"));
  assert!(matches!(&events[2], ExecutionEvent::TaskCompleted { label, .. } if label == "lang"));
  assert!(matches!(&events[3], ExecutionEvent::TaskStarted { label, .. } if label == "bad"));
  assert!(matches!(&events[4], ExecutionEvent::TaskFailed { label, .. } if label == "bad"));
  assert_eq!(
    events[5],
    ExecutionEvent::PipelineCompleted {
      execution_id: result.execution_id,
    }
  );
}

#[tokio::test]
async fn test_keyed_pipeline_without_key_records_errors() {
  let driver = Pipeline::new(Dispatcher::new(
    KeyedInvoker::new(ArchiveApi),
    OperationCatalog::default(),
  ));
  let def = pipeline(json!({
    "name": "nokey",
    "tasks": [{ "label": "lang", "operation": "detectlanguage", "args": { "text": "hi" } }]
  }));

  let result = driver.run(&def).await.unwrap();

  assert_eq!(result.failed, 1);
  assert_eq!(result.acc["lang"].error, Some(json!("no API key")));
}

#[tokio::test]
async fn test_outcomes_listed_in_task_order() {
  let def = pipeline(json!({
    "name": "ordered",
    "tasks": [
      { "label": "zeta", "operation": "detectlanguage", "args": { "text": "a" } },
      { "label": "alpha", "operation": "detectlanguage", "args": { "text": "b" } },
      { "label": "mid", "operation": "extracttext", "args": 5 },
      { "label": "beta", "operation": "listindexes" }
    ]
  }));

  let mut seeded = Accumulator::new();
  seeded.insert("seed".to_string(), TaskOutcome::success(json!({"files": []})));

  let result = driver().run_from(&def, seeded).await.unwrap();
  let outcomes = result.ordered_outcomes();

  let labels: Vec<&str> = outcomes.keys().map(String::as_str).collect();
  assert_eq!(labels, ["zeta", "alpha", "mid", "beta", "seed"]);
  assert!(outcomes["mid"].get("error").is_some());
}
