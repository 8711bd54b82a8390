//! Docpipe Session
//!
//! Guards remote calls behind a single replaceable API key.
//!
//! [`KeyedInvoker`] stamps the current key into every request. Key changes
//! are recorded as [`LogAction`]s and take part in the host's unit-of-work
//! lifecycle through the [`Transactional`] trait:
//!
//! ```text
//! init ─▶ begin ─▶ add_key/delete_key ─▶ prepare ─▶ commit
//!                                            └────▶ abort (key rolled back)
//! (restart) ─▶ resume(checkpoint) ─▶ same state as after commit
//! ```
//!
//! Invocations themselves are not transactional: a call that has been sent
//! is not undone by `abort`.

mod checkpoint;
mod error;
mod fs_store;
mod invoker;
mod lifecycle;
mod store;

pub use checkpoint::{Checkpoint, LogAction};
pub use error::SessionError;
pub use fs_store::FsCheckpointStore;
pub use invoker::KeyedInvoker;
pub use lifecycle::{Transactional, apply_unit, restore};
pub use store::{CheckpointStore, MemoryCheckpointStore};
