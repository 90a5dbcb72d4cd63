//! Directory ingestion for mdtree.
//!
//! [`read_directory`] walks a directory breadth-first and produces a
//! [`Document`](mdtree_sections::Document) with one section per entry, so a
//! whole source tree can be handed around as a single markdown file.
//!
//! ```no_run
//! # fn main() -> Result<(), mdtree_ingest::IngestError> {
//! use std::path::Path;
//! use mdtree_ingest::{read_directory, IngestOptions};
//!
//! let options = IngestOptions::new().with_exclude(["target", ".git"])?;
//! let doc = read_directory(Path::new("my-crate"), &options)?;
//! println!("{}", doc.to_text());
//! # Ok(())
//! # }
//! ```

mod directory;
mod error;
mod language;
mod options;

pub use directory::{read_directory, DIRECTORY_TOC_NAME};
pub use error::IngestError;
pub use language::fence_language;
pub use options::IngestOptions;
