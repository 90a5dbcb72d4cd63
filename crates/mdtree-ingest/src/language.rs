//! File kinds recognized during ingestion.

/// Fence language for a file extension (without the dot).
///
/// Returns an empty string for unknown extensions, which yields an untagged
/// fence.
#[must_use]
pub fn fence_language(extension: &str) -> &'static str {
    match extension {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "json" => "json",
        "yml" | "yaml" => "yaml",
        "ini" => "ini",
        "sql" => "sql",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "md" | "markdown" => "markdown",
        "txt" => "text",
        "sh" => "bash",
        "bat" => "batch",
        "ps1" => "powershell",
        "php" => "php",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "swift" => "swift",
        "dart" => "dart",
        "go" => "go",
        "rb" => "ruby",
        "pl" => "perl",
        "lua" => "lua",
        "r" => "r",
        "rs" => "rust",
        "toml" => "toml",
        "graphql" | "gql" => "graphql",
        _ => "",
    }
}

/// How a file is represented in the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileKind {
    /// Embedded as an image link.
    Image,
    /// Linked as a document.
    Pdf,
    /// Read and wrapped in a fenced block.
    Text,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "svg" => Self::Image,
            "pdf" => Self::Pdf,
            _ => Self::Text,
        }
    }
}
