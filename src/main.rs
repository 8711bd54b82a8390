use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use docpipe_config::{ConnectorConfig, OperationCatalog, PipelineDef};
use docpipe_host_http::HttpTransport;
use docpipe_runtime::{Dispatcher, Pipeline, SourcePreview, preview_source};
use docpipe_session::{FsCheckpointStore, KeyedInvoker, Transactional, apply_unit, restore};
use docpipe_wildcard::Accumulator;

/// Docpipe - chain document-analysis API calls with wildcard inputs
#[derive(Parser)]
#[command(name = "docpipe")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.docpipe)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Connector configuration file (JSON)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Name of the key session
  #[arg(long, global = true, default_value = "default")]
  session: String,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Manage the API key
  Key {
    #[command(subcommand)]
    action: KeyAction,
  },

  /// Run a pipeline file and print every task outcome
  Run {
    /// Path to the pipeline file (JSON)
    pipeline_file: PathBuf,

    /// Use this key for this run only
    #[arg(long, env = "DOCPIPE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
  },

  /// Show what a task's source resolves to, without calling the API
  Resolve {
    /// Path to the pipeline file (JSON)
    pipeline_file: PathBuf,

    /// Saved task outcomes (JSON object keyed by task label)
    #[arg(long)]
    acc: PathBuf,

    /// Label of the task to resolve
    #[arg(long)]
    task: String,
  },
}

#[derive(Subcommand)]
enum KeyAction {
  /// Store a new API key
  Add { key: String },
  /// Remove the stored API key
  Delete,
  /// Report whether a key is stored
  Status,
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".docpipe"),
  };
  let store = FsCheckpointStore::new(data_dir.join("sessions"));

  let rt = tokio::runtime::Runtime::new()?;

  match cli.command {
    Some(Commands::Key { action }) => rt.block_on(manage_key(action, &store, &cli.session)),
    Some(Commands::Run {
      pipeline_file,
      api_key,
    }) => rt.block_on(run_pipeline(
      pipeline_file,
      cli.config,
      api_key,
      &store,
      &cli.session,
    )),
    Some(Commands::Resolve {
      pipeline_file,
      acc,
      task,
    }) => rt.block_on(resolve_task(pipeline_file, cli.config, acc, task)),
    None => {
      println!("docpipe - use --help to see available commands");
      Ok(())
    }
  }
}

async fn manage_key(action: KeyAction, store: &FsCheckpointStore, session: &str) -> Result<()> {
  let mut keys = KeyedInvoker::new(());
  restore(&mut keys, store, session)
    .await
    .with_context(|| format!("failed to restore session '{}'", session))?;

  match action {
    KeyAction::Add { key } => {
      apply_unit(&mut keys, store, session, |k| k.add_key(key))
        .await
        .context("failed to store API key")?;
      eprintln!("API key stored for session '{}'", session);
    }
    KeyAction::Delete => {
      apply_unit(&mut keys, store, session, |k| k.delete_key())
        .await
        .context("failed to delete API key")?;
      eprintln!("API key deleted for session '{}'", session);
    }
    KeyAction::Status => {
      let status = if keys.key().is_some() { "set" } else { "not set" };
      println!("{}", status);
    }
  }

  Ok(())
}

async fn run_pipeline(
  pipeline_file: PathBuf,
  config_file: Option<PathBuf>,
  api_key: Option<String>,
  store: &FsCheckpointStore,
  session: &str,
) -> Result<()> {
  let pipeline = read_pipeline(&pipeline_file).await?;
  eprintln!("Loaded pipeline: {}", pipeline.name);

  let config = read_config(config_file).await?;
  let catalog =
    OperationCatalog::with_overrides(&config.operations).context("invalid operation catalog")?;
  let transport = HttpTransport::new(&config).context("failed to create HTTP transport")?;

  let mut invoker = KeyedInvoker::new(transport);
  restore(&mut invoker, store, session)
    .await
    .with_context(|| format!("failed to restore session '{}'", session))?;

  // A key given on the command line lives for this run only.
  let temporary_key = api_key.is_some();
  if let Some(key) = api_key {
    invoker.begin();
    invoker.add_key(key);
  }

  if invoker.key().is_none() {
    warn!(session = %session, "no API key set, remote calls will fail");
  }

  let mut driver = Pipeline::new(Dispatcher::new(invoker, catalog));
  let result = driver.run(&pipeline).await.context("pipeline run failed")?;

  if temporary_key {
    driver.dispatcher_mut().invoker_mut().abort();
  }

  eprintln!("Execution completed: {}", result.execution_id);
  eprintln!(
    "Tasks executed: {} ({} failed)",
    result.acc.len(),
    result.failed
  );

  println!(
    "{}",
    serde_json::to_string_pretty(&result.ordered_outcomes())?
  );

  Ok(())
}

async fn resolve_task(
  pipeline_file: PathBuf,
  config_file: Option<PathBuf>,
  acc_file: PathBuf,
  label: String,
) -> Result<()> {
  let pipeline = read_pipeline(&pipeline_file).await?;
  let config = read_config(config_file).await?;
  let catalog =
    OperationCatalog::with_overrides(&config.operations).context("invalid operation catalog")?;

  let task = pipeline
    .tasks
    .iter()
    .find(|t| t.label == label)
    .with_context(|| format!("task '{}' not found in pipeline", label))?;

  let acc_content = tokio::fs::read_to_string(&acc_file)
    .await
    .with_context(|| format!("failed to read accumulator file: {}", acc_file.display()))?;
  let acc: Accumulator = serde_json::from_str(&acc_content)
    .with_context(|| format!("failed to parse accumulator file: {}", acc_file.display()))?;

  let preview = preview_source(&catalog, &acc, task)
    .with_context(|| format!("failed to resolve task '{}'", label))?;

  let output = match preview {
    SourcePreview::Bypassed(args) => {
      eprintln!(
        "Operation '{}' takes no standard input; arguments are sent as-is",
        task.operation
      );
      args
    }
    SourcePreview::Resolved(resolved) => resolved.to_value(),
  };

  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}

async fn read_config(path: Option<PathBuf>) -> Result<ConnectorConfig> {
  let Some(path) = path else {
    return Ok(ConnectorConfig::default());
  };

  let content = tokio::fs::read_to_string(&path)
    .await
    .with_context(|| format!("failed to read config file: {}", path.display()))?;

  ConnectorConfig::from_json(&content)
    .with_context(|| format!("failed to parse config file: {}", path.display()))
}

async fn read_pipeline(path: &Path) -> Result<PipelineDef> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read pipeline file: {}", path.display()))?;

  PipelineDef::from_json(&content)
    .with_context(|| format!("failed to parse pipeline file: {}", path.display()))
}
