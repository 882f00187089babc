//! Descent through mapping nodes.

use super::kind::{coerce, guess_kind, SPLAT};
use super::{AliasTrail, NavigationError, NavigationStrategy, Navigator, NodeContext, PathKey};
use crate::document::node::{NodeId, NodeKind, YamlScalar, YamlValue};
use crate::document::tree::YamlTree;
use log::debug;

impl<S: NavigationStrategy + ?Sized> Navigator<'_, S> {
    /// Matches `head` against the entries of `map`, falling back to merge
    /// sources and finally to creating the key.
    pub(crate) fn recurse_map(
        &mut self,
        tree: &mut YamlTree,
        map: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
        trail: &mut AliasTrail,
    ) -> Result<(), NavigationError> {
        if self.match_with_alias_fallback(tree, map, head, tail, path_stack, trail)? {
            return Ok(());
        }
        if head == SPLAT {
            return Ok(());
        }

        let ctx = NodeContext::new(head, tail, path_stack);
        if !self.strategy.auto_create_map(tree, map, &ctx) {
            debug!("no entry '{}' in node {} and not creating one", head, map);
            return Ok(());
        }

        let kind = guess_kind(tail, NodeKind::Null);
        debug!("creating entry '{}' in node {} as {}", head, map, kind);
        let key = tree.alloc(YamlValue::Scalar(YamlScalar::plain(head)));
        let value = tree.alloc_empty(kind);
        tree.push_entry(map, key, value);

        path_stack.push(PathKey::Key(head.to_string()));
        let result = self.traverse_node(tree, value, head, tail, path_stack);
        path_stack.pop();
        result
    }

    /// Direct matches first; merge sources are only searched when no key of
    /// `map` itself matched.
    pub(crate) fn match_with_alias_fallback(
        &mut self,
        tree: &mut YamlTree,
        map: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
        trail: &mut AliasTrail,
    ) -> Result<bool, NavigationError> {
        if self.match_direct(tree, map, head, tail, path_stack)? {
            return Ok(true);
        }

        let ctx = NodeContext::new(head, tail, path_stack);
        if !self.strategy.follow_alias(tree, map, &ctx) {
            return Ok(false);
        }
        self.search_aliases(tree, map, head, tail, path_stack, trail)
    }

    /// Descends into every entry of `map` whose key the strategy accepts, in
    /// insertion order. Returns whether any entry matched.
    pub(crate) fn match_direct(
        &mut self,
        tree: &mut YamlTree,
        map: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
    ) -> Result<bool, NavigationError> {
        let count = tree.entry_count(map);
        let mut matched = false;

        for index in 0..count {
            let Some((key, value)) = tree.entry(map, index) else {
                break;
            };
            let ctx = NodeContext::new(head, tail, path_stack);
            if !self.strategy.should_visit(tree, key, &ctx) {
                continue;
            }
            matched = true;

            let expected = guess_kind(tail, tree.kind(value));
            coerce(tree, value, expected);

            path_stack.push(PathKey::Key(tree.key_text(key)));
            let result = self.traverse_node(tree, value, head, tail, path_stack);
            path_stack.pop();
            result?;
        }

        Ok(matched)
    }
}
