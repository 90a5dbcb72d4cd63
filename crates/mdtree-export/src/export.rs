//! File-level export: HTML next to the source, then optionally a PDF.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::html::{DEFAULT_CSS, render_html};
use crate::pdf::{DEFAULT_PDF_RENDERER, PageOptions, PdfRenderer, WkHtmlToPdf};
use crate::ExportError;

/// Export settings.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// HTML output path; defaults to `<source dir>/<stem>.html`.
    pub html_path: Option<PathBuf>,
    /// PDF output path; defaults to `<source dir>/<stem>.pdf`.
    pub pdf_path: Option<PathBuf>,
    /// Stylesheet; defaults to [`DEFAULT_CSS`].
    pub css: Option<String>,
    /// Whether to produce a PDF at all.
    pub pdf: bool,
    /// Converter program used by [`export`].
    pub pdf_renderer: PathBuf,
    pub page: PageOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            html_path: None,
            pdf_path: None,
            css: None,
            pdf: true,
            pdf_renderer: PathBuf::from(DEFAULT_PDF_RENDERER),
            page: PageOptions::default(),
        }
    }
}

/// Files written by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub html_path: PathBuf,
    pub pdf_path: Option<PathBuf>,
}

/// Export `text` (the stored form of the document at `source_path`) using the
/// converter named in `options`.
///
/// # Errors
///
/// Returns [`ExportError`] if the HTML can't be written or the PDF conversion
/// fails.
pub fn export(
    text: &str,
    source_path: &Path,
    options: &ExportOptions,
) -> Result<ExportOutput, ExportError> {
    export_with(text, source_path, options, &WkHtmlToPdf::new(&options.pdf_renderer))
}

/// [`export`] with an explicit [`PdfRenderer`].
///
/// # Errors
///
/// Same as [`export`].
pub fn export_with(
    text: &str,
    source_path: &Path,
    options: &ExportOptions,
    renderer: &dyn PdfRenderer,
) -> Result<ExportOutput, ExportError> {
    let stem = source_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = source_path.parent().unwrap_or_else(|| Path::new(""));

    let html_path = options
        .html_path
        .clone()
        .unwrap_or_else(|| dir.join(format!("{stem}.html")));
    let css = options.css.as_deref().unwrap_or(DEFAULT_CSS);
    let html = render_html(text, &stem, css);
    fs::write(&html_path, html).map_err(|source| ExportError::Io {
        path: html_path.clone(),
        source,
    })?;
    info!(path = %html_path.display(), "Wrote HTML");

    let pdf_path = if options.pdf {
        let pdf_path = options
            .pdf_path
            .clone()
            .unwrap_or_else(|| dir.join(format!("{stem}.pdf")));
        renderer.render(&html_path, &pdf_path, &options.page)?;
        info!(path = %pdf_path.display(), "Wrote PDF");
        Some(pdf_path)
    } else {
        None
    };

    Ok(ExportOutput {
        html_path,
        pdf_path,
    })
}
