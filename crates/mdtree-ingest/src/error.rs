//! Error type for directory ingestion.

use std::path::PathBuf;

use mdtree_sections::DocumentError;

/// Error returned by [`read_directory`](crate::read_directory).
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The input path is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// An include or exclude pattern is not a valid glob.
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The input directory could not be listed.
    #[error("Cannot read directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every parent-prefixed name for an entry is already taken.
    #[error("No unique section name left for {}", .0.display())]
    NameExhausted(PathBuf),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
