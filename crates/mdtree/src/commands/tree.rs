//! `mdtree tree` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::Config;
use mdtree_sections::Outline;

use super::DocumentFile;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Print the outline as JSON.
    #[arg(long)]
    json: bool,
}

impl TreeArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, None)?;

        let doc = DocumentFile::new(&self.file)?.load(&config)?;
        let outline = doc.outline();

        if self.json {
            output.print(&serde_json::to_string_pretty(&outline)?);
        } else {
            output.print(&render_outline(&outline));
        }
        Ok(())
    }
}

/// One line per section, indented by level.
fn render_outline(outline: &Outline) -> String {
    let mut lines = Vec::new();
    let mut stack = vec![outline];
    while let Some(node) = stack.pop() {
        let indent = "  ".repeat(node.level - 1);
        match &node.path {
            Some(path) => lines.push(format!("{indent}{} ({path})", node.name)),
            None => lines.push(format!("{indent}{}", node.name)),
        }
        stack.extend(node.children.iter().rev());
    }
    lines.join("\n")
}
