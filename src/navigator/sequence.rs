//! Descent through sequence nodes: single index, splat, and append.

use super::kind::{coerce, guess_kind, parse_index};
use super::{NavigationError, NavigationStrategy, Navigator, PathKey};
use crate::document::node::{NodeId, NodeKind};
use crate::document::tree::YamlTree;
use log::debug;

impl<S: NavigationStrategy + ?Sized> Navigator<'_, S> {
    /// Descends into the element at `head`. An index past the end matches
    /// nothing and is not an error.
    pub(crate) fn index_sequence(
        &mut self,
        tree: &mut YamlTree,
        seq: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
    ) -> Result<(), NavigationError> {
        let index = parse_index(head).ok_or_else(|| NavigationError::InvalidIndex {
            segment: head.to_string(),
        })?;
        let Some(item) = tree.item(seq, index) else {
            debug!("index {} out of range for node {}", index, seq);
            return Ok(());
        };

        let expected = guess_kind(tail, tree.kind(item));
        coerce(tree, item, expected);

        path_stack.push(PathKey::Index(index));
        let result = self.traverse_node(tree, item, head, tail, path_stack);
        path_stack.pop();
        result
    }

    /// Descends into every element in ascending order.
    pub(crate) fn splat_sequence(
        &mut self,
        tree: &mut YamlTree,
        seq: NodeId,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
    ) -> Result<(), NavigationError> {
        let count = tree.item_count(seq);
        for index in 0..count {
            let Some(item) = tree.item(seq, index) else {
                break;
            };
            let expected = guess_kind(tail, tree.kind(item));
            coerce(tree, item, expected);

            let head = index.to_string();
            path_stack.push(PathKey::Index(index));
            let result = self.traverse_node(tree, item, &head, tail, path_stack);
            path_stack.pop();
            result?;
        }
        Ok(())
    }

    /// Appends one new element and descends into it.
    pub(crate) fn append_sequence(
        &mut self,
        tree: &mut YamlTree,
        seq: NodeId,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
    ) -> Result<(), NavigationError> {
        let kind = guess_kind(tail, NodeKind::Null);
        let item = tree.alloc_empty(kind);
        tree.push_item(seq, item);
        let index = tree.item_count(seq) - 1;
        debug!("appended {} at index {} of node {}", kind, index, seq);

        let head = index.to_string();
        path_stack.push(PathKey::Index(index));
        let result = self.traverse_node(tree, item, &head, tail, path_stack);
        path_stack.pop();
        result
    }
}
