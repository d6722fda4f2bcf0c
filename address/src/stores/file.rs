//! Filesystem-backed session storage.
//!
//! One directory per session, one file per key. Ending the session deletes
//! the directory, which is what gives the storage its session lifetime.

use crate::error::StorageError;
use crate::providers::SessionStorage;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Session storage under a per-session directory.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Use `dir` as the session directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory for `session_id` under the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn for_session(session_id: &str) -> Result<Self, StorageError> {
        Self::new(
            std::env::temp_dir()
                .join("vitrine-sessions")
                .join(sanitize(session_id)),
        )
    }

    /// Session directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// End the session, discarding everything stored in it.
    ///
    /// # Errors
    ///
    /// Returns error if the directory exists but cannot be removed.
    pub fn end_session(self) -> Result<(), StorageError> {
        match std::fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(key)))
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        // Readers see either the old or the new value, never a partial write.
        std::fs::write(&staging, value)?;
        std::fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
