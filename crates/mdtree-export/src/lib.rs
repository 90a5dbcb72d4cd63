//! HTML and PDF export for mdtree documents.
//!
//! The markdown body is rendered with `pulldown-cmark` into a standalone page
//! (viewport meta tag, embedded stylesheet, title from front matter). A PDF is
//! then produced by handing the HTML file to an external converter through the
//! [`PdfRenderer`] trait; [`WkHtmlToPdf`] runs a `wkhtmltopdf`-compatible
//! binary.

mod error;
mod export;
mod html;
mod pdf;

pub use error::ExportError;
pub use export::{ExportOptions, ExportOutput, export, export_with};
pub use html::{DEFAULT_CSS, render_html};
pub use pdf::{DEFAULT_PDF_RENDERER, PageOptions, PdfRenderer, WkHtmlToPdf};
