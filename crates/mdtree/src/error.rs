//! CLI error types.

use mdtree_config::ConfigError;
use mdtree_export::ExportError;
use mdtree_ingest::IngestError;
use mdtree_sections::DocumentError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Ingest(#[from] IngestError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
