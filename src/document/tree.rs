//! Arena storage for YAML documents.
//!
//! `YamlTree` owns every node of one document in a `Vec`, addressed by
//! `NodeId`. Mutation always goes through the arena by index, which lets the
//! navigator hold a node, its parent, and whatever an alias resolves to at the
//! same time without conflicting borrows.
//!
//! # Example
//!
//! ```
//! use yamlnav::document::node::{NodeKind, YamlScalar, YamlValue};
//! use yamlnav::document::tree::YamlTree;
//!
//! let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
//! let key = tree.alloc(YamlValue::Scalar(YamlScalar::plain("name")));
//! let value = tree.alloc(YamlValue::Scalar(YamlScalar::plain("Alice")));
//! tree.push_entry(tree.root(), key, value);
//!
//! let found = tree.lookup(tree.root(), "name").unwrap();
//! assert_eq!(tree.scalar_text(found), Some("Alice"));
//! ```

use super::node::{NodeId, NodeKind, YamlNode, YamlScalar, YamlValue};
use std::collections::{HashMap, HashSet};

/// A single YAML document stored as an arena of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlTree {
    nodes: Vec<YamlNode>,
    root: NodeId,
}

impl Default for YamlTree {
    fn default() -> Self {
        Self::empty_document()
    }
}

impl YamlTree {
    /// Creates a tree whose root is a Document wrapping a `Null` node.
    pub fn empty_document() -> Self {
        let mut tree = Self {
            nodes: vec![YamlNode::new(YamlValue::Null)],
            root: 0,
        };
        tree.root = tree.alloc(YamlValue::Document(0));
        tree
    }

    /// Creates a tree whose bare root is an empty node of `kind`.
    pub fn with_root_kind(kind: NodeKind) -> Self {
        Self {
            nodes: vec![YamlNode::new(YamlValue::empty(kind))],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Returns the root with any Document wrapper removed.
    pub fn content_root(&self) -> NodeId {
        match self.value(self.root) {
            YamlValue::Document(child) => *child,
            _ => self.root,
        }
    }

    /// Installs `child` as the document content, or as the bare root when
    /// the tree has no Document wrapper.
    pub fn set_content_root(&mut self, child: NodeId) {
        match &mut self.nodes[self.root].value {
            YamlValue::Document(slot) => *slot = child,
            _ => self.root = child,
        }
    }

    /// Number of nodes ever allocated, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alloc(&mut self, value: YamlValue) -> NodeId {
        self.nodes.push(YamlNode::new(value));
        self.nodes.len() - 1
    }

    /// Allocates a fresh, empty node of `kind`.
    pub fn alloc_empty(&mut self, kind: NodeKind) -> NodeId {
        match kind {
            NodeKind::Document => {
                let child = self.alloc(YamlValue::Null);
                self.alloc(YamlValue::Document(child))
            }
            _ => self.alloc(YamlValue::empty(kind)),
        }
    }

    pub fn node(&self, id: NodeId) -> &YamlNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut YamlNode {
        &mut self.nodes[id]
    }

    pub fn value(&self, id: NodeId) -> &YamlValue {
        &self.nodes[id].value
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].value.kind()
    }

    pub fn anchor(&self, id: NodeId) -> Option<&str> {
        self.nodes[id].anchor()
    }

    pub fn alias_target(&self, id: NodeId) -> Option<NodeId> {
        match self.value(id) {
            YamlValue::Alias(target) => Some(*target),
            _ => None,
        }
    }

    pub fn scalar(&self, id: NodeId) -> Option<&YamlScalar> {
        self.value(id).as_scalar()
    }

    pub fn scalar_text(&self, id: NodeId) -> Option<&str> {
        self.scalar(id).map(YamlScalar::text)
    }

    /// Text used for a mapping key in path stacks; non-scalar keys are empty.
    pub fn key_text(&self, key: NodeId) -> String {
        self.scalar_text(key).unwrap_or_default().to_string()
    }

    /// Follows alias links until a non-alias node, giving up on cycles.
    pub fn resolve(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match self.value(current) {
                YamlValue::Alias(target) => current = *target,
                _ => return Some(current),
            }
        }
        None
    }

    pub fn entry_count(&self, map: NodeId) -> usize {
        match self.value(map) {
            YamlValue::Mapping(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn entry(&self, map: NodeId, index: usize) -> Option<(NodeId, NodeId)> {
        match self.value(map) {
            YamlValue::Mapping(entries) => entries.get(index).copied(),
            _ => None,
        }
    }

    pub fn entries(&self, map: NodeId) -> &[(NodeId, NodeId)] {
        match self.value(map) {
            YamlValue::Mapping(entries) => entries,
            _ => &[],
        }
    }

    pub fn push_entry(&mut self, map: NodeId, key: NodeId, value: NodeId) {
        if let YamlValue::Mapping(entries) = &mut self.nodes[map].value {
            entries.push((key, value));
        }
    }

    pub fn item_count(&self, seq: NodeId) -> usize {
        match self.value(seq) {
            YamlValue::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    pub fn item(&self, seq: NodeId, index: usize) -> Option<NodeId> {
        match self.value(seq) {
            YamlValue::Sequence(items) => items.get(index).copied(),
            _ => None,
        }
    }

    pub fn push_item(&mut self, seq: NodeId, item: NodeId) {
        if let YamlValue::Sequence(items) = &mut self.nodes[seq].value {
            items.push(item);
        }
    }

    /// Returns the value of the first entry whose key text equals `key`,
    /// looking through an alias on `map` itself but not through merge keys.
    pub fn lookup(&self, map: NodeId, key: &str) -> Option<NodeId> {
        let map = self.resolve(map)?;
        self.entries(map)
            .iter()
            .find(|(k, _)| self.scalar_text(*k) == Some(key))
            .map(|(_, v)| *v)
    }

    /// Replaces the content of `target` with a deep copy of `source_id`.
    ///
    /// The target keeps its own anchor, so aliases that pointed at it now see
    /// the new content.
    pub fn overwrite(&mut self, target: NodeId, source: &YamlTree, source_id: NodeId) {
        let mut copies = HashMap::new();
        self.copy_from(source, source_id, Some(target), &mut copies);
    }

    /// Copies the fragment under `id` into a standalone document.
    ///
    /// An alias at `id` is resolved first; a cyclic one yields an empty
    /// document. Aliases between nodes of the fragment are kept. Aliases that
    /// point outside it are replaced by copies of what they point at, so the
    /// result can be emitted on its own.
    pub fn extract(&self, id: NodeId) -> YamlTree {
        let Some(id) = self.resolve(id) else {
            return YamlTree::empty_document();
        };
        let mut owned = HashSet::new();
        self.collect_owned(id, &mut owned);

        let mut out = YamlTree::empty_document();
        let mut copies = HashMap::new();
        let mut expanding = Vec::new();
        let root = out.extract_from(self, id, &owned, &mut copies, &mut expanding);
        out.set_content_root(root);
        out
    }

    /// Nodes structurally below `id`, not counting alias targets.
    fn collect_owned(&self, id: NodeId, owned: &mut HashSet<NodeId>) {
        if !owned.insert(id) {
            return;
        }
        match self.value(id) {
            YamlValue::Document(child) => self.collect_owned(*child, owned),
            YamlValue::Mapping(entries) => {
                for (key, value) in entries {
                    self.collect_owned(*key, owned);
                    self.collect_owned(*value, owned);
                }
            }
            YamlValue::Sequence(items) => {
                for item in items {
                    self.collect_owned(*item, owned);
                }
            }
            YamlValue::Scalar(_) | YamlValue::Alias(_) | YamlValue::Null => {}
        }
    }

    fn extract_from(
        &mut self,
        source: &YamlTree,
        source_id: NodeId,
        owned: &HashSet<NodeId>,
        copies: &mut HashMap<NodeId, NodeId>,
        expanding: &mut Vec<NodeId>,
    ) -> NodeId {
        if let YamlValue::Alias(target) = source.value(source_id) {
            if !owned.contains(target) {
                let target = *target;
                if expanding.contains(&target) {
                    return self.alloc(YamlValue::Null);
                }
                expanding.push(target);
                let copy = self.extract_from(source, target, owned, copies, expanding);
                expanding.pop();
                return copy;
            }
        }

        let is_owned = owned.contains(&source_id);
        if is_owned {
            if let Some(existing) = copies.get(&source_id) {
                return *existing;
            }
        }

        let id = self.alloc(YamlValue::Null);
        if is_owned {
            copies.insert(source_id, id);
            self.nodes[id].anchor = source.anchor(source_id).map(str::to_string);
        }

        let value = match source.value(source_id) {
            YamlValue::Document(child) => {
                YamlValue::Document(self.extract_from(source, *child, owned, copies, expanding))
            }
            YamlValue::Mapping(entries) => YamlValue::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| {
                        (
                            self.extract_from(source, *k, owned, copies, expanding),
                            self.extract_from(source, *v, owned, copies, expanding),
                        )
                    })
                    .collect(),
            ),
            YamlValue::Sequence(items) => YamlValue::Sequence(
                items
                    .iter()
                    .map(|item| self.extract_from(source, *item, owned, copies, expanding))
                    .collect(),
            ),
            YamlValue::Alias(target) => {
                YamlValue::Alias(self.extract_from(source, *target, owned, copies, expanding))
            }
            YamlValue::Scalar(scalar) => YamlValue::Scalar(scalar.clone()),
            YamlValue::Null => YamlValue::Null,
        };
        self.nodes[id].value = value;
        id
    }

    fn copy_from(
        &mut self,
        source: &YamlTree,
        source_id: NodeId,
        into: Option<NodeId>,
        copies: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if let Some(existing) = copies.get(&source_id) {
            return *existing;
        }

        let id = match into {
            Some(id) => id,
            None => {
                let id = self.alloc(YamlValue::Null);
                self.nodes[id].anchor = source.anchor(source_id).map(str::to_string);
                id
            }
        };
        copies.insert(source_id, id);

        let value = match source.value(source_id) {
            YamlValue::Document(child) => {
                YamlValue::Document(self.copy_from(source, *child, None, copies))
            }
            YamlValue::Mapping(entries) => YamlValue::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| {
                        (
                            self.copy_from(source, *k, None, copies),
                            self.copy_from(source, *v, None, copies),
                        )
                    })
                    .collect(),
            ),
            YamlValue::Sequence(items) => YamlValue::Sequence(
                items
                    .iter()
                    .map(|item| self.copy_from(source, *item, None, copies))
                    .collect(),
            ),
            YamlValue::Alias(target) => {
                YamlValue::Alias(self.copy_from(source, *target, None, copies))
            }
            YamlValue::Scalar(scalar) => YamlValue::Scalar(scalar.clone()),
            YamlValue::Null => YamlValue::Null,
        };
        self.nodes[id].value = value;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(tree: &mut YamlTree, text: &str) -> NodeId {
        tree.alloc(YamlValue::Scalar(YamlScalar::plain(text)))
    }

    #[test]
    fn test_empty_document_wraps_null() {
        let tree = YamlTree::empty_document();
        assert_eq!(tree.kind(tree.root()), NodeKind::Document);
        assert_eq!(tree.kind(tree.content_root()), NodeKind::Null);
    }

    #[test]
    fn test_set_content_root_replaces_document_child() {
        let mut tree = YamlTree::empty_document();
        let map = tree.alloc_empty(NodeKind::Mapping);
        tree.set_content_root(map);
        assert_eq!(tree.content_root(), map);
        assert_eq!(tree.kind(tree.root()), NodeKind::Document);
    }

    #[test]
    fn test_entries_and_items() {
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let root = tree.root();
        let key = scalar(&mut tree, "list");
        let list = tree.alloc_empty(NodeKind::Sequence);
        tree.push_entry(root, key, list);
        let one = scalar(&mut tree, "1");
        tree.push_item(list, one);

        assert_eq!(tree.entry_count(root), 1);
        assert_eq!(tree.entry(root, 0), Some((key, list)));
        assert_eq!(tree.item(list, 0), Some(one));
        assert_eq!(tree.item(list, 1), None);
    }

    #[test]
    fn test_resolve_follows_alias_and_detects_cycle() {
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let alias = tree.alloc(YamlValue::Alias(tree.root()));
        assert_eq!(tree.resolve(alias), Some(tree.root()));

        let a = tree.alloc(YamlValue::Null);
        let b = tree.alloc(YamlValue::Alias(a));
        tree.node_mut(a).value = YamlValue::Alias(b);
        assert_eq!(tree.resolve(a), None);
    }

    #[test]
    fn test_overwrite_keeps_target_identity() {
        let mut target = YamlTree::with_root_kind(NodeKind::Mapping);
        let node = scalar(&mut target, "old");
        let alias = target.alloc(YamlValue::Alias(node));

        let mut source = YamlTree::with_root_kind(NodeKind::Scalar);
        let new_value = scalar(&mut source, "new");
        source.set_root(new_value);

        target.overwrite(node, &source, source.root());
        assert_eq!(target.scalar_text(node), Some("new"));
        assert_eq!(target.resolve(alias), Some(node));
    }

    #[test]
    fn test_extract_inlines_outside_aliases() {
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let root = tree.root();
        let base_key = scalar(&mut tree, "base");
        let base = scalar(&mut tree, "shared");
        tree.node_mut(base).set_anchor(Some("b".to_string()));
        tree.push_entry(root, base_key, base);

        let list_key = scalar(&mut tree, "list");
        let list = tree.alloc_empty(NodeKind::Sequence);
        tree.push_entry(root, list_key, list);
        let outside = tree.alloc(YamlValue::Alias(base));
        let own = scalar(&mut tree, "own");
        tree.node_mut(own).set_anchor(Some("o".to_string()));
        let inside = tree.alloc(YamlValue::Alias(own));
        tree.push_item(list, outside);
        tree.push_item(list, own);
        tree.push_item(list, inside);

        let fragment = tree.extract(list);
        let copied = fragment.content_root();
        let items: Vec<_> = (0..fragment.item_count(copied))
            .filter_map(|index| fragment.item(copied, index))
            .collect();
        assert_eq!(fragment.kind(items[0]), NodeKind::Scalar);
        assert_eq!(fragment.scalar_text(items[0]), Some("shared"));
        assert_eq!(fragment.anchor(items[0]), None);
        assert_eq!(fragment.alias_target(items[2]), Some(items[1]));
        assert_eq!(fragment.anchor(items[1]), Some("o"));
    }

    #[test]
    fn test_extract_breaks_cycles() {
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let a = tree.alloc(YamlValue::Null);
        let b = tree.alloc(YamlValue::Alias(a));
        tree.node_mut(a).value = YamlValue::Alias(b);

        let fragment = tree.extract(a);
        assert_eq!(fragment.kind(fragment.content_root()), NodeKind::Null);
    }
}
