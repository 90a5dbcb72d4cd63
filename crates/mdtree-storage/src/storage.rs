//! Backend interface for reading and writing document text.
//!
//! Paths handed to a [`Storage`] are relative to the backend root, such as
//! `prompt.md` or `notes/week-12.md`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// What went wrong, independent of the backend.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    /// Path is absolute, escapes the root, or has the wrong shape.
    InvalidPath,
    /// Stored bytes are not UTF-8 text.
    InvalidData,
    Other,
}

impl StorageErrorKind {
    fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::InvalidData => Self::InvalidData,
            _ => Self::Other,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::AlreadyExists => "Already exists",
            Self::InvalidPath => "Invalid path",
            Self::InvalidData => "Invalid data",
            Self::Other => "Storage error",
        }
    }
}

/// Whether repeating the call could succeed. Nothing in mdtree retries; the
/// status is there for drivers.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ErrorStatus {
    #[default]
    Permanent,
    Temporary,
}

impl ErrorStatus {
    fn from_io(kind: io::ErrorKind) -> Self {
        if matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) {
            Self::Temporary
        } else {
            Self::Permanent
        }
    }
}

/// Error reported by a [`Storage`] backend.
#[derive(Debug)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub status: ErrorStatus,
    /// Path the failed call was about.
    pub path: Option<PathBuf>,
    /// Short backend name such as `fs` or `mock`.
    pub backend: Option<&'static str>,
    source: Option<BoxedSource>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::default(),
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    #[must_use]
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_path(path)
    }

    /// Classify an I/O failure on `path`.
    #[must_use]
    pub fn io(err: io::Error, path: Option<PathBuf>) -> Self {
        let kind = err.kind();
        Self {
            kind: StorageErrorKind::from_io(kind),
            status: ErrorStatus::from_io(kind),
            path,
            backend: None,
            source: Some(Box::new(err)),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

/// `Not found 'notes/a.md': <source> [fs]`
impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.label())?;
        if let Some(path) = &self.path {
            write!(f, " '{}'", path.display())?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(backend) = self.backend {
            write!(f, " [{backend}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            Some(source) => Some(source.as_ref()),
            None => None,
        }
    }
}

/// Backing store for document text.
///
/// A document is loaded with one [`Storage::read`] and persisted with one
/// [`Storage::write`]. Calls block and are never retried.
pub trait Storage: Send + Sync {
    /// Full text stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if nothing is stored there or it can't be read.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Store `text` at `path`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the text can't be written.
    fn write(&self, path: &Path, text: &str) -> Result<(), StorageError>;

    /// Whether a document is stored at `path`. Invalid paths don't exist.
    fn exists(&self, path: &Path) -> bool;
}
