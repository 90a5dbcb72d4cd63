//! Predefined section layouts.

use tracing::debug;

use crate::edit::{AddSection, ConflictPolicy};
use crate::error::DocumentError;
use crate::Document;

/// Placeholder content for an empty root.
const REQUEST_PLACEHOLDER: &str = "***Write your request here***";

/// Section layouts that can be applied to a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Template {
    /// Prompt layout: a request in the root followed by context sections.
    #[default]
    Prompt,
}

impl Template {
    /// Sections added under the root, in order, as `(name, content)`.
    fn sections(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Prompt => &[
                ("Context", ""),
                ("RAG", ""),
                ("CAG", ""),
                ("System Prompt", "Answer in Markdown format."),
                ("History", ""),
            ],
        }
    }
}

/// Options for [`Document::apply_template`].
#[derive(Clone, Copy, Debug)]
pub struct TemplateOptions {
    /// Remove every section below the root first.
    pub clear: bool,
    /// Policy for template sections whose name is already used.
    pub on_conflict: ConflictPolicy,
}

impl Default for TemplateOptions {
    /// Existing sections are skipped.
    fn default() -> Self {
        Self {
            clear: false,
            on_conflict: ConflictPolicy::ErrorIfExists,
        }
    }
}

impl Document {
    /// Add the sections of `template` below the root.
    ///
    /// An empty root gets a placeholder request. Template sections that clash
    /// with an existing section under the current policy are left out.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`DocumentError::NameCollision`] raised
    /// while adding the sections.
    pub fn apply_template(
        &mut self,
        template: Template,
        options: TemplateOptions,
    ) -> Result<(), DocumentError> {
        if options.clear {
            self.clear_root_children()?;
        }

        let root = self.root().id();
        if self.root().content().is_empty() {
            self.set_content(root, REQUEST_PLACEHOLDER)?;
        }

        for &(name, content) in template.sections() {
            let request = AddSection::new(name)
                .with_content(content)
                .on_conflict(options.on_conflict);
            match self.add_or_replace_child(root, request) {
                Ok(_) => {}
                Err(DocumentError::NameCollision { name, existing }) => {
                    debug!(section = %name, existing = %existing, "Template section skipped");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
