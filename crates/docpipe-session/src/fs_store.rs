use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::SessionError;
use crate::store::CheckpointStore;

/// Filesystem-based checkpoint store.
///
/// Each session is one JSON file:
/// ```text
/// {root}/
/// ├── default.json
/// └── nightly-batch.json
/// ```
/// Saves go through a temporary file and a rename, so a crash mid-write
/// leaves the previous checkpoint intact.
pub struct FsCheckpointStore {
  root: PathBuf,
}

impl FsCheckpointStore {
  /// Create a store rooted at the given directory. The directory is created
  /// on first save.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Path of a session's checkpoint file.
  fn session_path(&self, session: &str) -> Result<PathBuf, SessionError> {
    let valid = !session.is_empty()
      && session
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
      return Err(SessionError::InvalidSessionName(session.to_string()));
    }
    Ok(self.root.join(format!("{}.json", session)))
  }
}

#[async_trait]
impl CheckpointStore for FsCheckpointStore {
  async fn load(&self, session: &str) -> Result<Option<String>, SessionError> {
    let path = self.session_path(session)?;
    match fs::read_to_string(&path).await {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn save(&self, session: &str, payload: &str) -> Result<(), SessionError> {
    let path = self.session_path(session)?;
    let tmp_path = self.root.join(format!(".{}.json.tmp", session));

    fs::create_dir_all(&self.root).await?;
    fs::write(&tmp_path, payload).await?;
    fs::rename(&tmp_path, &path).await?;
    Ok(())
  }

  async fn delete(&self, session: &str) -> Result<(), SessionError> {
    let path = self.session_path(session)?;
    match fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_session_path() {
    let store = FsCheckpointStore::new("/var/lib/docpipe");
    assert_eq!(
      store.session_path("nightly-batch_2").unwrap(),
      PathBuf::from("/var/lib/docpipe/nightly-batch_2.json")
    );
  }

  #[test]
  fn test_session_path_rejects_traversal() {
    let store = FsCheckpointStore::new("/var/lib/docpipe");
    assert!(store.session_path("../etc/passwd").is_err());
    assert!(store.session_path("").is_err());
    assert!(store.session_path("a/b").is_err());
  }
}
