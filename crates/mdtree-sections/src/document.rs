//! Document lifecycle and read access.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use mdtree_meta::{join_front_matter, split_front_matter, FrontMatter};
use mdtree_storage::{Storage, StorageError};
use tracing::{debug, info};

use crate::error::DocumentError;
use crate::parse::{linearize, parse_body, synthesized_root_name};
use crate::section::{SectionMeta, SectionRef};
use crate::tree::Tree;
use crate::SectionId;

/// Default name of the table-of-contents section.
pub const DEFAULT_TOC_NAME: &str = "Content";

/// Required extension of stored documents.
const EXTENSION: &str = "md";

/// Where the document is in its load/edit/save cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentState {
    /// Parsed or modified since the last save.
    Loaded,
    /// Written to storage, no modification since.
    Saved,
}

/// Nested name/level summary of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Outline {
    pub name: String,
    pub level: usize,
    /// Provenance path from section metadata.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub path: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Outline>,
}

impl Outline {
    fn from_section(section: SectionRef<'_>) -> Self {
        Self {
            name: section.name().to_owned(),
            level: section.level(),
            path: section.meta().path.clone(),
            children: section.children().map(Self::from_section).collect(),
        }
    }
}

/// A heading-structured document held as a section tree.
///
/// The tree is the single source of truth. Every mutation goes through a
/// transaction that linearizes a modified copy, parses it back and swaps it in
/// only if the result has the intended shape, so the text form and the tree
/// never disagree.
///
/// # Example
///
/// ```
/// use mdtree_sections::{AddSection, Document};
///
/// let mut doc = Document::parse("notes", "# Notes\n\n## Monday\n\nrain\n").unwrap();
/// let root = doc.root().id();
/// doc.add_or_replace_child(root, AddSection::new("Tuesday").with_content("sun"))
///     .unwrap();
///
/// assert_eq!(
///     doc.raw_text(),
///     "# Notes\n\n## Monday\n\nrain\n\n## Tuesday\n\nsun\n\n"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Document {
    name: String,
    pub(crate) tree: Tree,
    raw_text: String,
    front_matter: Option<FrontMatter>,
    toc_name: String,
    base_dir: Option<PathBuf>,
    state: DocumentState,
}

impl Document {
    /// Empty document whose root is named after `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let tree = Tree::with_root(&synthesized_root_name(&name));
        Self::from_tree(name, tree, None)
    }

    /// Parse stored text: an optional front matter block followed by the body.
    ///
    /// # Errors
    ///
    /// Returns the structural error found by the parser
    /// ([`DocumentError::MultipleRoots`], [`DocumentError::InvalidNesting`],
    /// [`DocumentError::NameCollision`]).
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, DocumentError> {
        let name = name.into();
        let (front_matter, body) = split_front_matter(text);
        let tree = parse_body(body, &name, None)?;
        tree.check_invariants()?;
        debug!(document = %name, sections = tree.len(), "Parsed document");
        Ok(Self::from_tree(name, tree, front_matter))
    }

    fn from_tree(name: String, tree: Tree, front_matter: Option<FrontMatter>) -> Self {
        let raw_text = linearize(&tree);
        Self {
            name,
            tree,
            raw_text,
            front_matter,
            toc_name: DEFAULT_TOC_NAME.to_owned(),
            base_dir: None,
            state: DocumentState::Loaded,
        }
    }

    /// Read and parse the document stored at `path`.
    ///
    /// The document is named after the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if `path` has no `.md` extension or
    /// can't be read, and any parse error otherwise.
    pub fn load(storage: &dyn Storage, path: &Path) -> Result<Self, DocumentError> {
        check_extension(path)?;
        let text = storage.read(path)?;
        let doc = Self::parse(document_name(path), &text)?;
        info!(path = %path.display(), sections = doc.len(), "Loaded document");
        Ok(doc)
    }

    /// Load the document at `path`, or start an empty one if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`Document::load`], except that a missing document is not an
    /// error.
    pub fn open_or_create(storage: &dyn Storage, path: &Path) -> Result<Self, DocumentError> {
        check_extension(path)?;
        if !storage.exists(path) {
            debug!(path = %path.display(), "Document not found, starting empty");
            return Ok(Self::new(document_name(path)));
        }
        Self::load(storage, path)
    }

    /// Resync and write the document to `path` in a single storage call.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if `path` has no `.md` extension or
    /// the write fails. The document stays `Loaded` in that case.
    pub fn save(&mut self, storage: &dyn Storage, path: &Path) -> Result<(), DocumentError> {
        check_extension(path)?;
        self.resync()?;
        storage.write(path, &self.to_text())?;
        self.state = DocumentState::Saved;
        info!(path = %path.display(), sections = self.len(), "Saved document");
        Ok(())
    }

    /// Document name (file stem for loaded documents).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> DocumentState {
        self.state
    }

    #[must_use]
    pub fn root(&self) -> SectionRef<'_> {
        let id = self.tree.root();
        SectionRef::new(self, id, self.tree.root_node())
    }

    /// View of a live section; `None` for stale handles.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<SectionRef<'_>> {
        self.tree
            .node(id)
            .map(|node| SectionRef::new(self, id, node))
    }

    /// Section with exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SectionRef<'_>> {
        self.tree.get(name).and_then(|id| self.section(id))
    }

    /// Section whose name matches `name` in any letter case.
    #[must_use]
    pub fn find_ignore_case(&self, name: &str) -> Option<SectionRef<'_>> {
        self.tree.find_folded(name).and_then(|id| self.section(id))
    }

    /// Number of sections, root included.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// All sections in pre-order, starting with the root.
    #[must_use]
    pub fn sections(&self) -> Vec<SectionRef<'_>> {
        self.tree
            .preorder()
            .into_iter()
            .filter_map(|id| self.section(id))
            .collect()
    }

    /// Body text produced by the last resync.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Full stored form: front matter block followed by the body.
    #[must_use]
    pub fn to_text(&self) -> String {
        join_front_matter(self.front_matter.as_ref(), &self.raw_text)
    }

    #[must_use]
    pub fn front_matter(&self) -> Option<&FrontMatter> {
        self.front_matter.as_ref()
    }

    pub fn set_front_matter(&mut self, front_matter: Option<FrontMatter>) {
        self.front_matter = front_matter;
        self.state = DocumentState::Loaded;
    }

    /// Name of the table-of-contents section.
    #[must_use]
    pub fn toc_name(&self) -> &str {
        &self.toc_name
    }

    pub fn set_toc_name(&mut self, name: impl Into<String>) {
        self.toc_name = name.into();
    }

    /// Directory that relative link targets resolve against.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = Some(dir.into());
    }

    /// Merge `meta` into the metadata of section `id`.
    ///
    /// Metadata is not part of the text, so no resync is needed.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownSection`] if `id` is stale.
    pub fn merge_meta(&mut self, id: SectionId, meta: SectionMeta) -> Result<(), DocumentError> {
        let node = self
            .tree
            .node_mut(id)
            .ok_or(DocumentError::UnknownSection(id))?;
        node.meta.merge(meta);
        Ok(())
    }

    #[must_use]
    pub fn outline(&self) -> Outline {
        Outline::from_section(self.root())
    }

    /// Swap in a tree rebuilt from its own text.
    pub(crate) fn install(&mut self, tree: Tree, raw_text: String) {
        self.tree = tree;
        self.raw_text = raw_text;
        self.state = DocumentState::Loaded;
    }
}

fn check_extension(path: &Path) -> Result<(), StorageError> {
    if path.extension().and_then(OsStr::to_str) == Some(EXTENSION) {
        Ok(())
    } else {
        Err(StorageError::invalid_path(path))
    }
}

fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use mdtree_storage::{MockStorage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::AddSection;

    #[test]
    fn test_new_synthesizes_root() {
        let doc = Document::new("weekly notes");

        assert_eq!(doc.root().name(), "Weekly Notes");
        assert_eq!(doc.root().level(), 1);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.raw_text(), "# Weekly Notes\n\n");
        assert_eq!(doc.state(), DocumentState::Loaded);
    }

    #[test]
    fn test_new_with_symbol_in_name_accepts_children() {
        let mut doc = Document::new("C#");
        assert_eq!(doc.root().name(), "C");

        let root = doc.root().id();
        doc.add_or_replace_child(root, AddSection::new("Intro").with_content("hello"))
            .unwrap();

        assert_eq!(doc.raw_text(), "# C\n\n## Intro\n\nhello\n\n");
        doc.resync().unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_headingless_text_with_symbol_in_name() {
        let mut doc = Document::parse("notes#", "just text").unwrap();

        assert_eq!(doc.root().name(), "Notes");
        doc.resync().unwrap();
        assert_eq!(doc.raw_text(), "# Notes\n\njust text\n\n");
    }

    #[test]
    fn test_parse_keeps_front_matter() {
        let text = "---\ntitle: Notes\n---\n\n# Root\n\ntext\n";

        let doc = Document::parse("notes", text).unwrap();

        assert_eq!(doc.front_matter().unwrap().raw(), "title: Notes");
        assert_eq!(doc.raw_text(), "# Root\n\ntext\n\n");
        assert_eq!(doc.to_text(), text);
    }

    #[test]
    fn test_lookup() {
        let doc = Document::parse("notes", "# Root\n## Intro\n### Details\n").unwrap();

        assert_eq!(doc.get("Intro").unwrap().level(), 2);
        assert!(doc.get("intro").is_none());
        assert_eq!(doc.find_ignore_case("DETAILS").unwrap().name(), "Details");

        let names: Vec<_> = doc.sections().iter().map(SectionRef::name).collect();
        assert_eq!(names, vec!["Root", "Intro", "Details"]);
    }

    #[test]
    fn test_merge_meta_survives_resync() {
        let mut doc = Document::parse("notes", "# Root\n## A\n").unwrap();
        let a = doc.get("A").unwrap().id();

        doc.merge_meta(a, SectionMeta::with_path("./a")).unwrap();
        doc.resync().unwrap();

        assert_eq!(doc.section(a).unwrap().meta().path.as_deref(), Some("./a"));
    }

    #[test]
    fn test_outline() {
        let doc = Document::parse("notes", "# Root\n## A\n### A1\n## B\n").unwrap();

        let outline = doc.outline();

        assert_eq!(outline.name, "Root");
        assert_eq!(outline.children.len(), 2);
        assert_eq!(outline.children[0].children[0].name, "A1");
        assert_eq!(outline.children[0].children[0].level, 3);
    }

    #[test]
    fn test_load_and_save_with_mock_storage() {
        let storage = MockStorage::new().with_file("notes.md", "# Root\n\nbody\n");
        let path = Path::new("notes.md");

        let mut doc = Document::load(&storage, path).unwrap();
        assert_eq!(doc.name(), "notes");
        assert_eq!(doc.root().content(), "body");

        doc.save(&storage, path).unwrap();

        assert_eq!(doc.state(), DocumentState::Saved);
        assert_eq!(storage.file("notes.md"), Some("# Root\n\nbody\n".to_owned()));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let storage = MockStorage::new().with_file("notes.txt", "# Root");

        let err = Document::load(&storage, Path::new("notes.txt")).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::Storage(ref e) if e.kind == StorageErrorKind::InvalidPath
        ));
    }

    #[test]
    fn test_load_missing() {
        let storage = MockStorage::new();

        let err = Document::load(&storage, Path::new("missing.md")).unwrap_err();

        assert!(matches!(err, DocumentError::Storage(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_open_or_create_missing_starts_empty() {
        let storage = MockStorage::new();

        let doc = Document::open_or_create(&storage, Path::new("prompt.md")).unwrap();

        assert_eq!(doc.root().name(), "Prompt");
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_open_or_create_missing_text_file_is_rejected() {
        let storage = MockStorage::new();

        let err = Document::open_or_create(&storage, Path::new("notes.txt")).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::Storage(ref e) if e.kind == StorageErrorKind::InvalidPath
        ));
    }

    #[test]
    fn test_open_or_create_existing() {
        let storage = MockStorage::new().with_file("prompt.md", "# Existing\n");

        let doc = Document::open_or_create(&storage, Path::new("prompt.md")).unwrap();

        assert_eq!(doc.root().name(), "Existing");
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let storage = MockStorage::new().with_failing_writes();
        let mut doc = Document::new("notes");

        let err = doc.save(&storage, Path::new("notes.md")).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::Storage(ref e) if e.kind == StorageErrorKind::PermissionDenied
        ));
        assert_eq!(doc.state(), DocumentState::Loaded);
    }

    #[test]
    fn test_save_with_fs_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = mdtree_storage::FsStorage::new(temp_dir.path().to_path_buf());
        let path = Path::new("sub/notes.md");

        let mut doc = Document::new("notes");
        doc.set_front_matter(Some(FrontMatter::new("title: Notes")));
        doc.save(&storage, path).unwrap();

        let reloaded = Document::load(&storage, path).unwrap();
        assert_eq!(reloaded.root().name(), "Notes");
        assert_eq!(reloaded.front_matter().unwrap().title(), Some("Notes".to_owned()));
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("sub/notes.md")).unwrap(),
            "---\ntitle: Notes\n---\n\n# Notes\n"
        );
    }
}
