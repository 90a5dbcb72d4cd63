//! Configuration management for mdtree.
//!
//! Parses `mdtree.toml` with serde and discovers it in the working directory
//! or any of its parents. Command-line flags are applied on top of the file
//! through [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` expands to the value of VAR, and fails if it is unset
//! - `${VAR:-default}` expands to VAR if set, otherwise to `default`
//!
//! Expanded fields:
//! - `document.toc_name`
//! - `export.css`
//! - `export.pdf_renderer`
//! - `export.page_size`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdtree.toml";

/// Command-line settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the table-of-contents section name.
    pub toc_name: Option<String>,
    /// Override whether nested headings in added content are kept.
    pub keep_nested_headings: Option<bool>,
    /// Override the export stylesheet.
    pub css: Option<PathBuf>,
    /// Override whether a PDF is produced on export.
    pub pdf: Option<bool>,
    /// Override the PDF converter program.
    pub pdf_renderer: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document editing configuration.
    pub document: DocumentConfig,
    /// Directory ingestion configuration.
    pub ingest: IngestConfig,
    /// Export configuration (paths are relative strings from TOML).
    export: ExportConfigRaw,

    /// Resolved export configuration (set after loading).
    #[serde(skip)]
    pub export_resolved: ExportConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Document editing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Name of the table-of-contents section.
    pub toc_name: String,
    /// Keep headings inside added content as real subsections.
    pub keep_nested_headings: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            toc_name: "Content".to_owned(),
            keep_nested_headings: false,
        }
    }
}

/// Directory ingestion configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Glob patterns for paths to leave out.
    pub exclude: Vec<String>,
    /// Glob patterns for paths to keep even when excluded.
    pub include: Vec<String>,
}

/// Raw export configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportConfigRaw {
    css: Option<String>,
    pdf: Option<bool>,
    pdf_renderer: Option<String>,
    page_size: Option<String>,
    margin: Option<String>,
    encoding: Option<String>,
}

/// Resolved export configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Stylesheet file; `None` means the built-in one.
    pub css: Option<PathBuf>,
    /// Whether a PDF is produced next to the HTML.
    pub pdf: bool,
    /// PDF converter program.
    pub pdf_renderer: String,
    pub page_size: String,
    /// Margin applied to all four sides.
    pub margin: String,
    pub encoding: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            css: None,
            pdf: true,
            pdf_renderer: "wkhtmltopdf".to_owned(),
            page_size: "A4".to_owned(),
            margin: "10mm".to_owned(),
            encoding: "UTF-8".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`export.css`").
        field: String,
        /// Error message (e.g., "${`DOC_CSS`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional command-line settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `mdtree.toml` in the current directory and its parents, falling
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(toc_name) = &settings.toc_name {
            self.document.toc_name.clone_from(toc_name);
        }
        if let Some(keep) = settings.keep_nested_headings {
            self.document.keep_nested_headings = keep;
        }
        if let Some(css) = &settings.css {
            self.export_resolved.css = Some(css.clone());
        }
        if let Some(pdf) = settings.pdf {
            self.export_resolved.pdf = pdf;
        }
        if let Some(renderer) = &settings.pdf_renderer {
            self.export_resolved.pdf_renderer.clone_from(renderer);
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let toc_name = &self.document.toc_name;
        require_non_empty(toc_name, "document.toc_name")?;
        if toc_name.contains(['\n', '\r']) {
            return Err(ConfigError::Validation(
                "document.toc_name must be a single line".to_owned(),
            ));
        }

        let export = &self.export_resolved;
        require_non_empty(&export.pdf_renderer, "export.pdf_renderer")?;
        require_non_empty(&export.page_size, "export.page_size")?;
        require_non_empty(&export.margin, "export.margin")?;
        require_non_empty(&export.encoding, "export.encoding")?;

        for pattern in self.ingest.exclude.iter().chain(&self.ingest.include) {
            require_non_empty(pattern, "ingest patterns")?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.document.toc_name = expand::expand_env(&self.document.toc_name, "document.toc_name")?;

        let export = &mut self.export;
        if let Some(css) = &export.css {
            export.css = Some(expand::expand_env(css, "export.css")?);
        }
        if let Some(renderer) = &export.pdf_renderer {
            export.pdf_renderer = Some(expand::expand_env(renderer, "export.pdf_renderer")?);
        }
        if let Some(page_size) = &export.page_size {
            export.page_size = Some(expand::expand_env(page_size, "export.page_size")?);
        }
        Ok(())
    }

    /// Resolve the raw export section; relative stylesheet paths are taken
    /// from `config_dir`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = ExportConfig::default();
        let raw = &self.export;
        self.export_resolved = ExportConfig {
            css: raw.css.as_deref().map(|css| config_dir.join(css)),
            pdf: raw.pdf.unwrap_or(defaults.pdf),
            pdf_renderer: raw.pdf_renderer.clone().unwrap_or(defaults.pdf_renderer),
            page_size: raw.page_size.clone().unwrap_or(defaults.page_size),
            margin: raw.margin.clone().unwrap_or(defaults.margin),
            encoding: raw.encoding.clone().unwrap_or(defaults.encoding),
        };
    }
}
