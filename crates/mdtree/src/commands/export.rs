//! `mdtree export` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::{CliSettings, Config, ExportConfig};
use mdtree_export::{ExportOptions, PageOptions, export};

use super::DocumentFile;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// HTML output path (default: next to the source).
    #[arg(long)]
    html: Option<PathBuf>,

    /// PDF output path (default: next to the source).
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Only write HTML.
    #[arg(long)]
    no_pdf: bool,

    /// Stylesheet file (overrides config).
    #[arg(long)]
    css: Option<PathBuf>,

    /// PDF converter program (overrides config).
    #[arg(long, env = "MDTREE_PDF_RENDERER")]
    pdf_renderer: Option<String>,
}

impl ExportArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            css: self.css,
            pdf: self.no_pdf.then_some(false),
            pdf_renderer: self.pdf_renderer,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let file = DocumentFile::new(&self.file)?;
        let doc = file.load(&config)?;

        let mut options = export_options(&config.export_resolved)?;
        options.html_path = self.html;
        options.pdf_path = self.pdf;

        output.info(&format!("Exporting {}...", file.path().display()));
        let result = export(&doc.to_text(), &file.path(), &options)?;

        output.success(&format!("HTML: {}", result.html_path.display()));
        if let Some(pdf_path) = result.pdf_path {
            output.success(&format!("PDF: {}", pdf_path.display()));
        }
        Ok(())
    }
}

fn export_options(config: &ExportConfig) -> Result<ExportOptions, CliError> {
    let css = match &config.css {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let page = PageOptions {
        page_size: config.page_size.clone(),
        encoding: config.encoding.clone(),
        ..PageOptions::default()
    }
    .with_margin(&config.margin);

    Ok(ExportOptions {
        css,
        pdf: config.pdf,
        pdf_renderer: PathBuf::from(&config.pdf_renderer),
        page,
        ..ExportOptions::default()
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_export_options_from_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let css_path = temp_dir.path().join("print.css");
        std::fs::write(&css_path, "body { margin: 0; }").unwrap();
        let config = ExportConfig {
            css: Some(css_path),
            pdf: false,
            margin: "20mm".to_owned(),
            page_size: "Letter".to_owned(),
            ..ExportConfig::default()
        };

        let options = export_options(&config).unwrap();

        assert_eq!(options.css.as_deref(), Some("body { margin: 0; }"));
        assert!(!options.pdf);
        assert_eq!(options.pdf_renderer, PathBuf::from("wkhtmltopdf"));
        assert_eq!(options.page.page_size, "Letter");
        assert_eq!(options.page.margin_bottom, "20mm");
        assert_eq!(options.page.encoding, "UTF-8");
    }

    #[test]
    fn test_export_options_missing_css() {
        let config = ExportConfig {
            css: Some(PathBuf::from("/nonexistent/print.css")),
            ..ExportConfig::default()
        };

        assert!(matches!(export_options(&config), Err(CliError::Io(_))));
    }
}
