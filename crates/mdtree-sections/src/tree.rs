//! Arena storage for the section tree.
//!
//! Nodes live in a flat `Vec` indexed by [`SectionId`]; removed nodes leave an
//! empty slot so that stale handles never alias a newer section. Two indexes
//! map names to handles: an exact one and a case-folded one used for the
//! document-wide uniqueness check.

use std::collections::HashMap;

use crate::error::DocumentError;
use crate::section::{Node, SectionMeta};
use crate::SectionId;

fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Section tree with name lookups.
#[derive(Clone, Debug)]
pub(crate) struct Tree {
    nodes: Vec<Option<Node>>,
    root: SectionId,
    by_name: HashMap<String, SectionId>,
    by_folded: HashMap<String, SectionId>,
}

impl Tree {
    /// Tree holding only an empty root section.
    pub fn with_root(name: &str) -> Self {
        let root = SectionId(0);
        let node = Node::new(name.to_owned(), 1, String::new(), SectionMeta::default());
        Self {
            nodes: vec![Some(node)],
            root,
            by_name: HashMap::from([(name.to_owned(), root)]),
            by_folded: HashMap::from([(fold(name), root)]),
        }
    }

    pub fn root(&self) -> SectionId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
            .expect("root section is always present")
    }

    pub fn node(&self, id: SectionId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: SectionId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live node or [`DocumentError::UnknownSection`].
    pub fn require(&self, id: SectionId) -> Result<&Node, DocumentError> {
        self.node(id).ok_or(DocumentError::UnknownSection(id))
    }

    /// Section with exactly `name`.
    pub fn get(&self, name: &str) -> Option<SectionId> {
        self.by_name.get(name).copied()
    }

    /// Section whose name equals `name` ignoring case.
    pub fn find_folded(&self, name: &str) -> Option<SectionId> {
        self.by_folded.get(&fold(name)).copied()
    }

    /// Number of live sections.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Number of arena slots, live or not. Fresh handles start here.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Name of a live section, or an empty string for stale handles.
    pub fn name_of(&self, id: SectionId) -> &str {
        self.node(id).map_or("", |node| node.name.as_str())
    }

    /// Handles in pre-order, starting with the root.
    pub fn preorder(&self) -> Vec<SectionId> {
        self.preorder_from(self.root)
    }

    pub fn preorder_from(&self, start: SectionId) -> Vec<SectionId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Whether `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: SectionId, id: SectionId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.node(cur).and_then(|node| node.parent);
        }
        false
    }

    /// Move `id` behind its last sibling, keeping its subtree.
    pub fn move_to_end(&mut self, id: SectionId) {
        let Some(parent) = self.node(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|&child| child != id);
            parent.children.push(id);
        }
    }

    /// Remove `id` and its whole subtree. The root is never removed.
    ///
    /// Returns the number of removed sections.
    pub fn detach(&mut self, id: SectionId) -> usize {
        let Some(parent) = self.node(id).and_then(|node| node.parent) else {
            return 0;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|&child| child != id);
        }

        let subtree = self.preorder_from(id);
        for &removed in &subtree {
            if let Some(node) = self.nodes[removed.0].take() {
                self.by_folded.remove(&fold(&node.name));
                self.by_name.remove(&node.name);
            }
        }
        subtree.len()
    }

    /// Attach `node` as a child of `parent` at `index` (appended when `None`).
    ///
    /// The node gets a fresh handle and level `parent.level + 1`.
    pub fn insert_child(
        &mut self,
        parent: SectionId,
        index: Option<usize>,
        mut node: Node,
    ) -> Result<SectionId, DocumentError> {
        let level = self.require(parent)?.level + 1;
        self.ensure_unique(&node.name, None)?;

        let id = SectionId(self.nodes.len());
        node.level = level;
        node.parent = Some(parent);
        node.children.clear();
        self.by_name.insert(node.name.clone(), id);
        self.by_folded.insert(fold(&node.name), id);
        self.nodes.push(Some(node));

        if let Some(parent) = self.node_mut(parent) {
            let index = index.map_or(parent.children.len(), |i| i.min(parent.children.len()));
            parent.children.insert(index, id);
        }
        Ok(id)
    }

    /// Give section `id` a new name.
    pub fn rename(&mut self, id: SectionId, name: &str) -> Result<(), DocumentError> {
        self.ensure_unique(name, Some(id))?;
        let node = self.node_mut(id).ok_or(DocumentError::UnknownSection(id))?;
        let old = std::mem::replace(&mut node.name, name.to_owned());
        self.by_name.remove(&old);
        self.by_folded.remove(&fold(&old));
        self.by_name.insert(name.to_owned(), id);
        self.by_folded.insert(fold(name), id);
        Ok(())
    }

    /// Fail with [`DocumentError::NameCollision`] if another section already
    /// uses `name` in any letter case.
    fn ensure_unique(&self, name: &str, except: Option<SectionId>) -> Result<(), DocumentError> {
        match self.find_folded(name) {
            Some(existing) if Some(existing) != except => Err(DocumentError::NameCollision {
                name: name.to_owned(),
                existing: self.name_of(existing).to_owned(),
            }),
            _ => Ok(()),
        }
    }

    /// Check the structural invariants: a single level-1 root, every child one
    /// level below its parent with a matching back link, and indexes that list
    /// exactly the reachable sections.
    pub fn check_invariants(&self) -> Result<(), DocumentError> {
        let violation = |msg: String| Err(DocumentError::LevelInvariantViolation(msg));

        let root = self.require(self.root)?;
        if root.level != 1 || root.parent.is_some() {
            return violation(format!("root '{}' has level {}", root.name, root.level));
        }

        let reachable = self.preorder();
        for &id in &reachable {
            let node = self.require(id)?;
            for &child in &node.children {
                let Some(child_node) = self.node(child) else {
                    return violation(format!("'{}' lists a removed child", node.name));
                };
                if child_node.parent != Some(id) {
                    return violation(format!("'{}' has a stale parent link", child_node.name));
                }
                if child_node.level != node.level + 1 {
                    return violation(format!(
                        "'{}' has level {} under '{}' at level {}",
                        child_node.name, child_node.level, node.name, node.level
                    ));
                }
            }
            if self.by_folded.get(&fold(&node.name)) != Some(&id) {
                return violation(format!("'{}' is missing from the name index", node.name));
            }
        }

        if reachable.len() != self.by_name.len() || reachable.len() != self.by_folded.len() {
            return violation(format!(
                "{} reachable sections but {} indexed",
                reachable.len(),
                self.by_name.len()
            ));
        }
        Ok(())
    }
}

/// Incremental construction of a [`Tree`] from parsed headings.
///
/// When a previous tree is supplied, a section whose name already existed keeps
/// its handle and metadata. New names get handles past the previous tree's
/// arena, so they never collide with reused ones.
pub(crate) struct TreeBuilder<'r> {
    nodes: Vec<Option<Node>>,
    root: Option<SectionId>,
    by_name: HashMap<String, SectionId>,
    by_folded: HashMap<String, SectionId>,
    reuse: Option<&'r Tree>,
    next_id: usize,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(reuse: Option<&'r Tree>) -> Self {
        let next_id = reuse.map_or(0, Tree::slot_count);
        Self {
            nodes: Vec::new(),
            root: None,
            by_name: HashMap::new(),
            by_folded: HashMap::new(),
            reuse,
            next_id,
        }
    }

    pub fn root(&self) -> Option<SectionId> {
        self.root
    }

    pub fn name_of(&self, id: SectionId) -> &str {
        self.node(id).map_or("", |node| node.name.as_str())
    }

    pub fn level_of(&self, id: SectionId) -> usize {
        self.node(id).map_or(0, |node| node.level)
    }

    /// Nearest section at `level` on the chain starting at `from`.
    pub fn ancestor_at(&self, from: SectionId, level: usize) -> Option<SectionId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.node(id)?;
            if node.level == level {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    /// Add a section under `parent` (the root when `parent` is `None`).
    pub fn add(
        &mut self,
        name: &str,
        level: usize,
        parent: Option<SectionId>,
    ) -> Result<SectionId, DocumentError> {
        let folded = fold(name);
        if let Some(&existing) = self.by_folded.get(&folded) {
            return Err(DocumentError::NameCollision {
                name: name.to_owned(),
                existing: self.name_of(existing).to_owned(),
            });
        }

        let previous = self
            .reuse
            .and_then(|tree| tree.get(name).map(|id| (id, tree)));
        let (id, meta) = match previous {
            Some((id, tree)) => (id, tree.node(id).map(|n| n.meta.clone()).unwrap_or_default()),
            None => {
                let id = SectionId(self.next_id);
                self.next_id += 1;
                (id, SectionMeta::default())
            }
        };

        let mut node = Node::new(name.to_owned(), level, String::new(), meta);
        node.parent = parent;
        if self.nodes.len() <= id.0 {
            self.nodes.resize_with(id.0 + 1, || None);
        }
        self.nodes[id.0] = Some(node);
        self.by_name.insert(name.to_owned(), id);
        self.by_folded.insert(folded, id);

        match parent {
            Some(parent) => {
                if let Some(parent) = self.node_mut(parent) {
                    parent.children.push(id);
                }
            }
            None => self.root = Some(id),
        }
        Ok(id)
    }

    pub fn set_content(&mut self, id: SectionId, content: String) {
        if let Some(node) = self.node_mut(id) {
            node.content = content;
        }
    }

    /// Put `text` in front of the existing content of `id`.
    pub fn prepend_content(&mut self, id: SectionId, text: &str) {
        if let Some(node) = self.node_mut(id) {
            node.content = if node.content.is_empty() {
                text.to_owned()
            } else {
                format!("{text}\n\n{}", node.content)
            };
        }
    }

    /// Finish the tree.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::LevelInvariantViolation`] if no root was added.
    pub fn build(self) -> Result<Tree, DocumentError> {
        let root = self.root.ok_or_else(|| {
            DocumentError::LevelInvariantViolation("document has no root section".to_owned())
        })?;
        Ok(Tree {
            nodes: self.nodes,
            root,
            by_name: self.by_name,
            by_folded: self.by_folded,
        })
    }

    fn node(&self, id: SectionId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: SectionId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }
}
