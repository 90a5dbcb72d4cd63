//! Mutations of a [`Document`].
//!
//! Every mutation follows the same transaction: clone the tree, change the
//! copy, linearize it, parse the text back with the copy as reuse cache,
//! verify the parsed tree has the intended shape, then swap it in. Any error
//! on the way leaves the document untouched.

use tracing::debug;

use crate::error::DocumentError;
use crate::heading::{normalize_name, strip_nested_headings};
use crate::parse::{finish_content, linearize, parse_body};
use crate::section::{Node, SectionMeta};
use crate::tree::Tree;
use crate::{Document, SectionId};

/// What [`Document::add_or_replace_child`] does when the name is taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Update content and metadata of an exact-name child of the same parent,
    /// keeping its children and moving it behind its siblings. Any other match
    /// is a collision.
    #[default]
    UpdateContentIfExists,
    /// Any case-insensitive match is a collision.
    ErrorIfExists,
    /// Remove the matching section with its subtree and append a fresh one.
    Replace,
}

/// Request for [`Document::add_or_replace_child`].
#[derive(Clone, Debug)]
pub struct AddSection {
    name: String,
    content: String,
    meta: SectionMeta,
    on_conflict: ConflictPolicy,
    strip_nested_headings: bool,
}

impl AddSection {
    /// Empty section named `name` with the default conflict policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            meta: SectionMeta::default(),
            on_conflict: ConflictPolicy::default(),
            strip_nested_headings: true,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: SectionMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }

    /// Keep heading lines in the content instead of turning them into
    /// emphasized markers. Such headings become real sections on resync.
    #[must_use]
    pub fn keep_nested_headings(mut self) -> Self {
        self.strip_nested_headings = false;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How closely the reparsed tree must match the modified copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verify {
    /// Same sections, same shape, same content.
    Exact,
    /// Every intended section keeps its level and parent; content may have
    /// been split into extra sections.
    Structure,
}

/// Reject names that would not survive a linearize/parse round trip.
fn validate_name(name: &str) -> Result<(), DocumentError> {
    if name.is_empty() || name.contains(['\n', '\r']) || normalize_name(name) != name {
        return Err(DocumentError::InvalidName(name.to_owned()));
    }
    Ok(())
}

fn prepare_content(content: &str, strip: bool) -> String {
    if strip {
        finish_content(&strip_nested_headings(content))
    } else {
        finish_content(content)
    }
}

fn name_collision(tree: &Tree, name: &str, existing: SectionId) -> DocumentError {
    DocumentError::NameCollision {
        name: name.to_owned(),
        existing: tree.name_of(existing).to_owned(),
    }
}

fn verify(intended: &Tree, actual: &Tree, mode: Verify) -> Result<(), DocumentError> {
    let violation = |msg: String| Err(DocumentError::LevelInvariantViolation(msg));

    for id in intended.preorder() {
        let node = intended.require(id)?;
        let Some(found) = actual.get(&node.name).and_then(|id| actual.node(id)) else {
            return violation(format!("'{}' is missing after resync", node.name));
        };
        if found.level != node.level {
            return violation(format!(
                "'{}' expected at level {}, found at level {}",
                node.name, node.level, found.level
            ));
        }
        let expected_parent = node.parent.map(|p| intended.name_of(p));
        let found_parent = found.parent.map(|p| actual.name_of(p));
        if expected_parent != found_parent {
            return violation(format!(
                "'{}' moved from '{}' to '{}'",
                node.name,
                expected_parent.unwrap_or_default(),
                found_parent.unwrap_or_default()
            ));
        }
        if mode == Verify::Exact && found.content != node.content {
            return violation(format!("content of '{}' changed on resync", node.name));
        }
    }

    if mode == Verify::Exact && intended.len() != actual.len() {
        return violation(format!(
            "{} sections expected, {} found",
            intended.len(),
            actual.len()
        ));
    }
    Ok(())
}

impl Document {
    /// Linearize `working`, parse it back and install the result.
    fn commit(&mut self, working: &Tree, mode: Verify) -> Result<(), DocumentError> {
        let text = linearize(working);
        let tree = parse_body(&text, self.name(), Some(working))?;
        verify(working, &tree, mode)?;
        tree.check_invariants()?;
        debug!(document = %self.name(), sections = tree.len(), "Resynced document");
        let raw_text = linearize(&tree);
        self.install(tree, raw_text);
        Ok(())
    }

    /// Rebuild the tree from its own linearized text.
    ///
    /// A resync of an unmodified document is a no-op: same text, same handles.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::LevelInvariantViolation`] if the rebuilt tree
    /// differs from the current one.
    pub fn resync(&mut self) -> Result<(), DocumentError> {
        let working = self.tree.clone();
        self.commit(&working, Verify::Exact)
    }

    /// Add a child section under `parent`, or update/replace an existing one
    /// according to the request's [`ConflictPolicy`].
    ///
    /// Returns the handle of the resulting section in the resynced tree.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::InvalidName`] if the name is not in normalized form.
    /// - [`DocumentError::UnknownSection`] if `parent` is stale.
    /// - [`DocumentError::NameCollision`] if the name is taken and the policy
    ///   doesn't allow reuse, or if `Replace` would remove `parent` itself.
    /// - Parse errors and [`DocumentError::LevelInvariantViolation`] when kept
    ///   nested headings break the structure.
    pub fn add_or_replace_child(
        &mut self,
        parent: SectionId,
        request: AddSection,
    ) -> Result<SectionId, DocumentError> {
        let AddSection {
            name,
            content,
            meta,
            on_conflict,
            strip_nested_headings,
        } = request;
        validate_name(&name)?;

        let mut working = self.tree.clone();
        working.require(parent)?;
        let content = prepare_content(&content, strip_nested_headings);
        let existing = working.find_folded(&name);

        match (on_conflict, existing) {
            (_, None) => {
                let node = Node::new(name.clone(), 0, content, meta);
                working.insert_child(parent, None, node)?;
            }
            (ConflictPolicy::UpdateContentIfExists, Some(id))
                if working.name_of(id) == name
                    && working.node(id).and_then(|node| node.parent) == Some(parent) =>
            {
                if let Some(node) = working.node_mut(id) {
                    node.content = content;
                    node.meta.merge(meta);
                }
                working.move_to_end(id);
            }
            (ConflictPolicy::UpdateContentIfExists | ConflictPolicy::ErrorIfExists, Some(id)) => {
                return Err(name_collision(&working, &name, id));
            }
            (ConflictPolicy::Replace, Some(id)) => {
                if working.is_ancestor_or_self(id, parent) {
                    return Err(name_collision(&working, &name, id));
                }
                let removed = working.detach(id);
                debug!(section = %name, removed, "Replacing section");
                let node = Node::new(name.clone(), 0, content, meta);
                working.insert_child(parent, None, node)?;
            }
        }

        let mode = if strip_nested_headings {
            Verify::Exact
        } else {
            Verify::Structure
        };
        self.commit(&working, mode)?;
        self.tree.get(&name).ok_or_else(|| {
            DocumentError::LevelInvariantViolation(format!("'{name}' is missing after resync"))
        })
    }

    /// Delete the section named `name` together with its subtree.
    ///
    /// Returns `false` if no such section exists.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::CannotDeleteRoot`] for the root section.
    pub fn delete(&mut self, name: &str) -> Result<bool, DocumentError> {
        let Some(id) = self.tree.get(name) else {
            return Ok(false);
        };
        if id == self.tree.root() {
            return Err(DocumentError::CannotDeleteRoot(name.to_owned()));
        }

        let mut working = self.tree.clone();
        let removed = working.detach(id);
        self.commit(&working, Verify::Exact)?;
        debug!(section = %name, removed, "Deleted section");
        Ok(true)
    }

    /// Replace the content of section `id`, keeping name, children and meta.
    ///
    /// Heading lines are turned into emphasized markers like in
    /// [`Document::add_or_replace_child`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownSection`] if `id` is stale.
    pub fn set_content(&mut self, id: SectionId, content: &str) -> Result<(), DocumentError> {
        let mut working = self.tree.clone();
        let node = working
            .node_mut(id)
            .ok_or(DocumentError::UnknownSection(id))?;
        node.content = prepare_content(content, true);
        self.commit(&working, Verify::Exact)
    }

    /// Rename the root section.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidName`] or [`DocumentError::NameCollision`].
    pub fn set_root_name(&mut self, name: &str) -> Result<(), DocumentError> {
        validate_name(name)?;
        let mut working = self.tree.clone();
        working.rename(working.root(), name)?;
        self.commit(&working, Verify::Exact)
    }

    /// Remove every child of the root.
    pub(crate) fn clear_root_children(&mut self) -> Result<(), DocumentError> {
        let mut working = self.tree.clone();
        let children = working.root_node().children.clone();
        for child in children {
            working.detach(child);
        }
        self.commit(&working, Verify::Exact)
    }

    /// Place a generated section as the first child of the root, replacing a
    /// previous section with exactly the same name.
    pub(crate) fn put_first_child(
        &mut self,
        name: &str,
        content: String,
    ) -> Result<SectionId, DocumentError> {
        validate_name(name)?;
        let mut working = self.tree.clone();
        let root = working.root();
        if let Some(previous) = working.get(name) {
            if previous == root {
                return Err(DocumentError::NameCollision {
                    name: name.to_owned(),
                    existing: name.to_owned(),
                });
            }
            working.detach(previous);
        }
        let node = Node::new(name.to_owned(), 0, finish_content(&content), SectionMeta::default());
        working.insert_child(root, Some(0), node)?;
        self.commit(&working, Verify::Exact)?;
        self.tree.get(name).ok_or_else(|| {
            DocumentError::LevelInvariantViolation(format!("'{name}' is missing after resync"))
        })
    }
}
