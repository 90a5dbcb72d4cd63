//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading and writing documents below a local
//! root directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// All paths are resolved relative to `root_dir`. Paths that try to leave the
/// root through `..` components are rejected.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use mdtree_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("notes"));
/// let text = storage.read(Path::new("prompt.md"))?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory for document storage.
    root_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root_dir`.
    #[must_use]
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    /// Root directory this storage resolves paths against.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Validate that a path doesn't escape the root directory.
    ///
    /// Rejects paths containing parent directory components (`..`) to prevent
    /// path traversal (e.g., `../../../etc/passwd`).
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let has_parent_dir = path
            .components()
            .any(|c| matches!(c, Component::ParentDir));

        if has_parent_dir || path.as_os_str().is_empty() {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(())
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &Path) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root_dir.join(path);
        let text = fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;
        tracing::debug!(path = %full_path.display(), bytes = text.len(), "Read document");
        Ok(text)
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root_dir.join(path);
        if let Some(parent) = full_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(e, Some(parent.to_path_buf())).with_backend(BACKEND))?;
        }
        fs::write(&full_path, text)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;
        tracing::debug!(path = %full_path.display(), bytes = text.len(), "Wrote document");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        Self::validate_path(path).is_ok() && self.root_dir.join(path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StorageErrorKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("doc.md"), "# Doc\n\nBody\n").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let text = storage.read(Path::new("doc.md")).unwrap();

        assert_eq!(text, "# Doc\n\nBody\n");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read(Path::new("missing.md")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.path, Some(temp_dir.path().join("missing.md")));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read(Path::new("bin.md")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidData);
    }

    #[test]
    fn test_read_rejects_parent_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read(Path::new("../etc/passwd")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        storage
            .write(Path::new("nested/deeper/doc.md"), "# Doc\n")
            .unwrap();

        let written = fs::read_to_string(temp_dir.path().join("nested/deeper/doc.md")).unwrap();
        assert_eq!(written, "# Doc\n");
    }

    #[test]
    fn test_write_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        storage.write(Path::new("doc.md"), "first").unwrap();
        storage.write(Path::new("doc.md"), "second").unwrap();

        assert_eq!(storage.read(Path::new("doc.md")).unwrap(), "second");
    }

    #[test]
    fn test_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("doc.md"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir")).unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.exists(Path::new("doc.md")));
        assert!(!storage.exists(Path::new("dir")));
        assert!(!storage.exists(Path::new("missing.md")));
        assert!(!storage.exists(Path::new("../doc.md")));
    }
}
