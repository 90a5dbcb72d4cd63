//! Section tree engine for heading-structured markdown.
//!
//! A [`Document`] holds its text as a tree of sections: every heading opens a
//! section, the text up to the next heading is its content, and deeper
//! headings nest below shallower ones. The crate guarantees that the tree and
//! its flat text never drift apart:
//!
//! - the tree is the only source of truth, the text is derived from it
//! - every mutation linearizes and re-parses the tree before it is accepted
//! - section handles and metadata survive that round trip for every name that
//!   still exists
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), mdtree_sections::DocumentError> {
//! use mdtree_sections::{default_anchor, AddSection, ConflictPolicy, Document};
//!
//! let mut doc = Document::parse("guide", "# Guide\n\n## Install\n\nrun it\n")?;
//! let root = doc.root().id();
//!
//! doc.add_or_replace_child(root, AddSection::new("Usage").with_content("# Basics\nstart"))?;
//! doc.add_or_replace_child(
//!     root,
//!     AddSection::new("Install")
//!         .with_content("cargo install")
//!         .on_conflict(ConflictPolicy::Replace),
//! )?;
//! doc.render_table_of_contents(default_anchor)?;
//!
//! assert_eq!(doc.get("Usage").unwrap().content(), "***Basics***\nstart");
//! assert_eq!(doc.root().children().next().unwrap().name(), "Content");
//! # Ok(())
//! # }
//! ```

mod document;
mod edit;
mod error;
mod heading;
mod parse;
mod section;
mod template;
mod toc;
mod tree;

pub use document::{DEFAULT_TOC_NAME, Document, DocumentState, Outline};
pub use edit::{AddSection, ConflictPolicy};
pub use error::DocumentError;
pub use heading::{normalize_name, title_case};
pub use section::{Link, LinkKind, SectionId, SectionMeta, SectionRef};
pub use template::{Template, TemplateOptions};
pub use toc::{default_anchor, meta_path_anchor};
