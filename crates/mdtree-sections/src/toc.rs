//! Table-of-contents rendering.

use tracing::debug;

use crate::error::DocumentError;
use crate::section::SectionRef;
use crate::{Document, SectionId};

/// Anchor derived from the section name: `#` followed by the lower-cased name
/// with spaces replaced by `-`.
///
/// # Examples
///
/// ```
/// use mdtree_sections::{default_anchor, Document};
///
/// let doc = Document::parse("doc", "# Getting Started").unwrap();
/// assert_eq!(default_anchor(&doc.root()), "#getting-started");
/// ```
#[must_use]
pub fn default_anchor(section: &SectionRef<'_>) -> String {
    format!("#{}", section.name().to_lowercase().replace(' ', "-"))
}

/// Anchor taken from the section's `path` metadata, falling back to
/// [`default_anchor`] when none is set.
#[must_use]
pub fn meta_path_anchor(section: &SectionRef<'_>) -> String {
    match &section.meta().path {
        Some(path) => path.clone(),
        None => default_anchor(section),
    }
}

impl Document {
    /// Table-of-contents lines for the current tree.
    ///
    /// One `- [name](anchor)` line per section in pre-order, root included,
    /// indented by two spaces per level below the root. The table-of-contents
    /// section itself and anything under it are skipped.
    #[must_use]
    pub fn table_of_contents<F>(&self, anchor: F) -> String
    where
        F: Fn(&SectionRef<'_>) -> String,
    {
        let toc_name = self.toc_name();
        let mut lines = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(section) = stack.pop() {
            if section.name() == toc_name {
                continue;
            }
            lines.push(format!(
                "{}- [{}]({})",
                "  ".repeat(section.level() - 1),
                section.name(),
                anchor(&section)
            ));
            let children: Vec<_> = section.children().collect();
            stack.extend(children.into_iter().rev());
        }
        lines.join("\n")
    }

    /// Regenerate the table-of-contents section as the first child of the root.
    ///
    /// A previous section named [`Document::toc_name`] is removed first, so
    /// rendering twice yields the same document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NameCollision`] if the root or a section with a
    /// differently cased name already uses the table-of-contents name.
    pub fn render_table_of_contents<F>(&mut self, anchor: F) -> Result<SectionId, DocumentError>
    where
        F: Fn(&SectionRef<'_>) -> String,
    {
        let content = self.table_of_contents(anchor);
        let name = self.toc_name().to_owned();
        let id = self.put_first_child(&name, content)?;
        debug!(document = %self.name(), toc = %name, "Rendered table of contents");
        Ok(id)
    }
}
