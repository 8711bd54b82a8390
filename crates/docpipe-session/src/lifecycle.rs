//! Unit-of-work lifecycle driven by a durable-state host.

use tracing::{error, info};

use crate::error::SessionError;
use crate::store::CheckpointStore;

/// State that participates in a host's transactional log.
///
/// Mutations between `begin` and `commit` are visible in memory right away
/// but only become durable through the payload returned by `prepare`.
pub trait Transactional {
  /// Start from scratch: empty state, empty log.
  fn init(&mut self);

  /// Recover from a checkpoint payload (or from nothing) after a restart.
  ///
  /// Fails with a fatal error if the payload is corrupt.
  fn resume(&mut self, checkpoint: Option<&str>) -> Result<(), SessionError>;

  /// Start a unit of work.
  fn begin(&mut self);

  /// Serialize pending changes as the checkpoint payload. Does not mutate.
  fn prepare(&self) -> Result<String, SessionError>;

  /// Confirm the pending changes.
  fn commit(&mut self);

  /// Discard the pending changes and roll state back.
  fn abort(&mut self);
}

/// Run one unit of work and persist it.
///
/// The checkpoint is saved before `commit`; if preparing or saving fails the
/// unit is aborted and the error returned.
pub async fn apply_unit<T, S, F>(
  target: &mut T,
  store: &S,
  session: &str,
  change: F,
) -> Result<(), SessionError>
where
  T: Transactional,
  S: CheckpointStore + ?Sized,
  F: FnOnce(&mut T),
{
  target.begin();
  change(target);

  let saved = match target.prepare() {
    Ok(payload) => store.save(session, &payload).await,
    Err(e) => Err(e),
  };

  match saved {
    Ok(()) => {
      target.commit();
      info!(session = %session, "unit committed");
      Ok(())
    }
    Err(e) => {
      target.abort();
      error!(session = %session, error = %e, "unit aborted");
      Err(e)
    }
  }
}

/// Load the latest checkpoint for `session` and resume from it.
pub async fn restore<T, S>(target: &mut T, store: &S, session: &str) -> Result<(), SessionError>
where
  T: Transactional,
  S: CheckpointStore + ?Sized,
{
  let payload = store.load(session).await?;
  target.resume(payload.as_deref())
}
