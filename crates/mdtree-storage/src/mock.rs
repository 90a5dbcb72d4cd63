//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores document text in memory. Use the builder methods to configure the
/// mock with test data or to make every write fail.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use mdtree_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new().with_file("doc.md", "# Doc\n\nBody");
/// let text = storage.read(Path::new("doc.md")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<PathBuf, String>>,
    fail_writes: bool,
    writes: RwLock<usize>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add text for a path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.write().unwrap().insert(path.into(), text.into());
        self
    }

    /// Make every subsequent write fail with a permission error.
    #[must_use]
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Text currently stored at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().unwrap().get(path.as_ref()).cloned()
    }

    /// Number of successful writes so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap()
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &Path) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), text.to_owned());
        *self.writes.write().unwrap() += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_configured_file() {
        let storage = MockStorage::new().with_file("doc.md", "# Doc");

        assert_eq!(storage.read(Path::new("doc.md")).unwrap(), "# Doc");
        assert!(storage.exists(Path::new("doc.md")));
    }

    #[test]
    fn test_read_missing_file() {
        let storage = MockStorage::new();

        let err = storage.read(Path::new("doc.md")).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_write_then_read() {
        let storage = MockStorage::new();

        storage.write(Path::new("doc.md"), "# Doc").unwrap();

        assert_eq!(storage.file("doc.md"), Some("# Doc".to_owned()));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_failing_writes() {
        let storage = MockStorage::new()
            .with_file("doc.md", "before")
            .with_failing_writes();

        let err = storage.write(Path::new("doc.md"), "after").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert_eq!(storage.file("doc.md"), Some("before".to_owned()));
        assert_eq!(storage.write_count(), 0);
    }
}
