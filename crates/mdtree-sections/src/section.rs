//! Sections: arena nodes and their read-only views.
//!
//! A [`Document`](crate::Document) stores every section in a flat arena.
//! Parent/children relationships are tracked by [`SectionId`] handles, so the
//! tree owns its nodes strictly top-down and a parent link is just an index.
//!
//! Callers never hold a node directly. They get a [`SectionRef`], a borrowed
//! view that exposes the node's fields, navigation, and content-derived views
//! (embedded images, links, plain text, qualified path).

use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::Document;

/// First image reference on a line: `![label](target)`.
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").unwrap());

/// Any `[label](target)`; a captured `!` marks an image and is skipped.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Handle of a section inside its document's arena.
///
/// A handle stays valid across resyncs as long as a section with the same name
/// exists; deleting or replacing the section invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section #{}", self.0)
    }
}

/// Out-of-band annotations attached to a section.
///
/// Metadata is not part of the linearized text. It survives resyncs because
/// the parser reuses the previous node for every surviving name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionMeta {
    /// Provenance path (e.g. `./src/lib.rs` for an ingested file).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub path: Option<String>,
}

impl SectionMeta {
    /// Metadata with only the `path` key set.
    #[must_use]
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Check if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
    }

    /// Merge `other` into `self`; keys present in `other` win.
    pub fn merge(&mut self, other: SectionMeta) {
        if other.path.is_some() {
            self.path = other.path;
        }
    }
}

/// Arena node.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub name: String,
    pub level: usize,
    pub content: String,
    pub children: Vec<SectionId>,
    pub parent: Option<SectionId>,
    pub meta: SectionMeta,
    pub qualified_path: OnceCell<String>,
}

impl Node {
    pub fn new(name: String, level: usize, content: String, meta: SectionMeta) -> Self {
        Self {
            name,
            level,
            content,
            children: Vec::new(),
            parent: None,
            meta,
            qualified_path: OnceCell::new(),
        }
    }
}

/// Where a link target points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// Target resolves to an existing local file (resolved path).
    Local(PathBuf),
    /// Anything else: URLs, anchors, missing files.
    External,
}

/// A non-image `[label](target)` found in section content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub target: String,
    pub kind: LinkKind,
}

/// Borrowed, read-only view of one section.
#[derive(Clone, Copy)]
pub struct SectionRef<'a> {
    doc: &'a Document,
    id: SectionId,
    node: &'a Node,
}

impl fmt::Debug for SectionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionRef")
            .field("id", &self.id)
            .field("name", &self.node.name)
            .field("level", &self.node.level)
            .finish_non_exhaustive()
    }
}

impl<'a> SectionRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: SectionId, node: &'a Node) -> Self {
        Self { doc, id, node }
    }

    /// Arena handle of this section.
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    /// Nesting depth; the root is level 1.
    #[must_use]
    pub fn level(&self) -> usize {
        self.node.level
    }

    /// Raw text owned by this section, without nested headings.
    #[must_use]
    pub fn content(&self) -> &'a str {
        &self.node.content
    }

    #[must_use]
    pub fn meta(&self) -> &'a SectionMeta {
        &self.node.meta
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    #[must_use]
    pub fn parent(&self) -> Option<SectionRef<'a>> {
        self.node.parent.and_then(|id| self.doc.section(id))
    }

    /// Children in serialization order.
    pub fn children(&self) -> impl Iterator<Item = SectionRef<'a>> + use<'a> {
        let doc = self.doc;
        self.node
            .children
            .iter()
            .filter_map(move |&id| doc.section(id))
    }

    /// Direct child with exactly `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<SectionRef<'a>> {
        self.children().find(|child| child.name() == name)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = SectionRef<'a>> + use<'a> {
        std::iter::successors(self.parent(), SectionRef::parent)
    }

    /// This section and every section below it, in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<SectionRef<'a>> {
        let mut out = Vec::new();
        let mut stack = vec![*self];
        while let Some(section) = stack.pop() {
            let children: Vec<_> = section.children().collect();
            out.push(section);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Slash-joined chain of names from the document name down to this section.
    ///
    /// Computed once per node; a resync builds fresh nodes, so the value never
    /// outlives the tree shape it was computed from.
    #[must_use]
    pub fn qualified_path(&self) -> &'a str {
        self.node.qualified_path.get_or_init(|| match self.parent() {
            Some(parent) => format!("{}/{}", parent.qualified_path(), self.node.name),
            None => format!("{}/{}", self.doc.name(), self.node.name),
        })
    }

    /// Targets of image lines (`![label](target)`), one per line, in order.
    ///
    /// Angle brackets wrapping a target are removed.
    #[must_use]
    pub fn embedded_images(&self) -> Vec<String> {
        self.node
            .content
            .lines()
            .filter_map(|line| IMAGE_PATTERN.captures(line))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim_matches(['<', '>']).to_owned())
            .collect()
    }

    /// Every non-image link in content order, classified local or external.
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for line in self.node.content.lines() {
            for caps in LINK_PATTERN.captures_iter(line) {
                if &caps[1] == "!" {
                    continue;
                }
                let label = caps[2].trim().to_owned();
                let target = caps[3].trim().to_owned();
                let resolved = self.resolve(&target);
                let kind = if resolved.is_file() {
                    LinkKind::Local(resolved)
                } else {
                    LinkKind::External
                };
                links.push(Link {
                    label,
                    target,
                    kind,
                });
            }
        }
        links
    }

    /// Links whose target is an existing local file, as `(label, path)`.
    #[must_use]
    pub fn document_links(&self) -> Vec<(String, PathBuf)> {
        self.links()
            .into_iter()
            .filter_map(|link| match link.kind {
                LinkKind::Local(path) => Some((link.label, path)),
                LinkKind::External => None,
            })
            .collect()
    }

    /// Links whose target is not a local file, as `(label, target)`.
    #[must_use]
    pub fn external_links(&self) -> Vec<(String, String)> {
        self.links()
            .into_iter()
            .filter(|link| link.kind == LinkKind::External)
            .map(|link| (link.label, link.target))
            .collect()
    }

    /// Content with surrounding blank lines and whitespace removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.node.content.trim().to_owned()
    }

    fn resolve(&self, target: &str) -> PathBuf {
        let target = Path::new(target);
        match self.doc.base_dir() {
            Some(base) if target.is_relative() => base.join(target),
            _ => target.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse("notes", body).unwrap()
    }

    #[test]
    fn test_meta_merge_overrides_present_keys() {
        let mut meta = SectionMeta::with_path("./a");
        meta.merge(SectionMeta::default());
        assert_eq!(meta.path.as_deref(), Some("./a"));

        meta.merge(SectionMeta::with_path("./b"));
        assert_eq!(meta.path.as_deref(), Some("./b"));
    }

    #[test]
    fn test_navigation() {
        let doc = doc("# Root\n\n## A\n\n### A1\n\n## B\n");
        let root = doc.root();

        let names: Vec<_> = root.children().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let a1 = doc.get("A1").unwrap();
        let ancestors: Vec<_> = a1.ancestors().map(|s| s.name()).collect();
        assert_eq!(ancestors, vec!["A", "Root"]);
        assert_eq!(a1.parent().unwrap().child("A1").unwrap().id(), a1.id());

        let all: Vec<_> = root.descendants().iter().map(|s| s.name()).collect();
        assert_eq!(all, vec!["Root", "A", "A1", "B"]);
    }

    #[test]
    fn test_qualified_path() {
        let doc = doc("# Root\n\n## A\n\n### A1\n");

        assert_eq!(doc.root().qualified_path(), "notes/Root");
        assert_eq!(doc.get("A1").unwrap().qualified_path(), "notes/Root/A/A1");
    }

    #[test]
    fn test_embedded_images() {
        let doc = doc(
            "# Root\n\n![diagram](img/a.png)\ntext ![x](<img/b c.png>) and ![y](img/ignored.png)\n[not image](img/c.png)",
        );

        assert_eq!(
            doc.root().embedded_images(),
            vec!["img/a.png".to_owned(), "img/b c.png".to_owned()]
        );
    }

    #[test]
    fn test_links_split_local_and_external() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("guide.md"), "").unwrap();

        let mut doc = doc(
            "# Root\n\nSee [Guide]( guide.md ) and [Site](https://example.com).\n![img](guide.md)\n[Missing](missing.md)",
        );
        doc.set_base_dir(temp_dir.path());
        let root = doc.root();

        assert_eq!(
            root.document_links(),
            vec![("Guide".to_owned(), temp_dir.path().join("guide.md"))]
        );
        assert_eq!(
            root.external_links(),
            vec![
                ("Site".to_owned(), "https://example.com".to_owned()),
                ("Missing".to_owned(), "missing.md".to_owned()),
            ]
        );
        assert_eq!(root.links().len(), 3);
    }

    #[test]
    fn test_plain_text_keeps_links() {
        let doc = doc("# Root\n\n\n  text with [a](b)  \n\n");

        assert_eq!(doc.root().plain_text(), "text with [a](b)");
    }
}
