//! PDF rendering through an external HTML-to-PDF converter.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::ExportError;

/// Default converter program.
pub const DEFAULT_PDF_RENDERER: &str = "wkhtmltopdf";

/// Page layout handed to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub page_size: String,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub encoding: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: "A4".to_owned(),
            margin_top: "10mm".to_owned(),
            margin_right: "10mm".to_owned(),
            margin_bottom: "10mm".to_owned(),
            margin_left: "10mm".to_owned(),
            encoding: "UTF-8".to_owned(),
        }
    }
}

impl PageOptions {
    /// Same margin on every side.
    #[must_use]
    pub fn with_margin(mut self, margin: &str) -> Self {
        margin.clone_into(&mut self.margin_top);
        margin.clone_into(&mut self.margin_right);
        margin.clone_into(&mut self.margin_bottom);
        margin.clone_into(&mut self.margin_left);
        self
    }

    /// Command-line flags in `wkhtmltopdf` syntax.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        [
            ("--page-size", &self.page_size),
            ("--margin-top", &self.margin_top),
            ("--margin-right", &self.margin_right),
            ("--margin-bottom", &self.margin_bottom),
            ("--margin-left", &self.margin_left),
            ("--encoding", &self.encoding),
        ]
        .into_iter()
        .flat_map(|(flag, value)| [flag.to_owned(), value.clone()])
        .collect()
    }
}

/// Converts a rendered HTML file into a PDF file.
pub trait PdfRenderer {
    /// Write the PDF for `html_path` to `pdf_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the conversion fails.
    fn render(
        &self,
        html_path: &Path,
        pdf_path: &Path,
        page: &PageOptions,
    ) -> Result<(), ExportError>;
}

/// [`PdfRenderer`] backed by a `wkhtmltopdf`-compatible executable.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    program: PathBuf,
}

impl WkHtmlToPdf {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for WkHtmlToPdf {
    fn default() -> Self {
        Self::new(DEFAULT_PDF_RENDERER)
    }
}

impl PdfRenderer for WkHtmlToPdf {
    fn render(
        &self,
        html_path: &Path,
        pdf_path: &Path,
        page: &PageOptions,
    ) -> Result<(), ExportError> {
        debug!(
            program = %self.program.display(),
            html = %html_path.display(),
            pdf = %pdf_path.display(),
            "Running PDF renderer"
        );
        let output = Command::new(&self.program)
            .arg("--quiet")
            .args(page.args())
            .arg(html_path)
            .arg(pdf_path)
            .output()
            .map_err(|source| ExportError::RendererUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExportError::Renderer {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_page_args() {
        assert_eq!(
            PageOptions::default().args(),
            vec![
                "--page-size", "A4", "--margin-top", "10mm", "--margin-right", "10mm",
                "--margin-bottom", "10mm", "--margin-left", "10mm", "--encoding", "UTF-8",
            ]
        );
    }

    #[test]
    fn test_with_margin() {
        let page = PageOptions::default().with_margin("5mm");

        assert_eq!(page.margin_top, "5mm");
        assert_eq!(page.margin_left, "5mm");
    }

    #[test]
    fn test_missing_program() {
        let renderer = WkHtmlToPdf::new("/nonexistent/mdtree-pdf-renderer");

        let err = renderer
            .render(Path::new("a.html"), Path::new("a.pdf"), &PageOptions::default())
            .unwrap_err();

        assert!(matches!(err, ExportError::RendererUnavailable { .. }));
    }
}
