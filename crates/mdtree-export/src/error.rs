//! Error type for document export.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Error returned by [`export`](crate::export) and [`PdfRenderer`](crate::PdfRenderer)s.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Reading or writing a file failed.
    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF converter could not be started.
    #[error("Cannot run PDF renderer '{}': {source}", program.display())]
    RendererUnavailable {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF converter ran and failed.
    #[error("PDF renderer failed ({status}): {stderr}")]
    Renderer { status: ExitStatus, stderr: String },
}
