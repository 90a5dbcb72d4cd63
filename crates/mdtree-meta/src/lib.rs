//! Front matter handling for mdtree documents.
//!
//! A document may start with a YAML block delimited by `---` lines. The section
//! tree treats that block as an opaque payload: it is split off before the body
//! is parsed and joined back, byte-for-byte, when the document is written.
//!
//! - [`split_front_matter`] / [`join_front_matter`] move between the stored text
//!   and the `(front matter, body)` pair.
//! - [`FrontMatter`] keeps the raw block and offers typed access through
//!   `serde_yaml` for callers that want to read or produce it.

mod front_matter;
mod split;

pub use front_matter::{FrontMatter, FrontMatterError, FrontMatterFields};
pub use split::{join_front_matter, split_front_matter};
