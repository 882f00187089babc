//! Writing a value at every node a path designates.

use super::matcher::KeyMatcher;
use crate::config::Config;
use crate::document::node::{tags, NodeId, NodeKind};
use crate::document::tree::YamlTree;
use crate::navigator::{render_path, NavigationError, NavigationStrategy, NodeContext};
use log::debug;

/// Overwrites each visited node with a deep copy of `value`.
///
/// The visited node keeps its id and anchor, so aliases pointing at it see
/// the new content.
#[derive(Debug)]
pub struct UpdateStrategy<'v> {
    matcher: KeyMatcher,
    value: &'v YamlTree,
    auto_create: bool,
    follow_aliases: bool,
    strict_kinds: bool,
    updated: usize,
}

impl<'v> UpdateStrategy<'v> {
    pub fn new(value: &'v YamlTree) -> Self {
        Self {
            matcher: KeyMatcher::new(),
            value,
            auto_create: true,
            follow_aliases: true,
            strict_kinds: false,
            updated: 0,
        }
    }

    /// Takes `auto_create`, `follow_aliases` and `strict_kinds` from `config`.
    pub fn from_config(value: &'v YamlTree, config: &Config) -> Self {
        Self::new(value)
            .with_auto_create(config.auto_create)
            .with_follow_aliases(config.follow_aliases)
            .with_strict_kinds(config.strict_kinds)
    }

    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }

    pub fn with_follow_aliases(mut self, follow_aliases: bool) -> Self {
        self.follow_aliases = follow_aliases;
        self
    }

    /// Refuse to replace a non-null node with a non-null value of another kind.
    pub fn with_strict_kinds(mut self, strict_kinds: bool) -> Self {
        self.strict_kinds = strict_kinds;
        self
    }

    /// Number of nodes written so far.
    pub fn updated(&self) -> usize {
        self.updated
    }
}

impl NavigationStrategy for UpdateStrategy<'_> {
    fn should_visit(&self, tree: &YamlTree, key: NodeId, ctx: &NodeContext<'_>) -> bool {
        self.matcher.matches(ctx.head, &tree.key_text(key))
    }

    fn follow_alias(&self, _tree: &YamlTree, _node: NodeId, _ctx: &NodeContext<'_>) -> bool {
        self.follow_aliases
    }

    fn auto_create_map(&self, _tree: &YamlTree, _node: NodeId, _ctx: &NodeContext<'_>) -> bool {
        self.auto_create
    }

    fn visit(
        &mut self,
        tree: &mut YamlTree,
        node: NodeId,
        ctx: &NodeContext<'_>,
    ) -> Result<(), NavigationError> {
        let source = self.value.content_root();
        let current = effective_kind(tree, node);
        let replacement = effective_kind(self.value, source);

        if self.strict_kinds
            && current != NodeKind::Null
            && replacement != NodeKind::Null
            && current != replacement
        {
            return Err(NavigationError::Visit {
                path: render_path(ctx.path_stack),
                message: format!("refusing to replace a {} with a {}", current, replacement),
            });
        }

        debug!("updating node {} at {}", node, render_path(ctx.path_stack));
        tree.overwrite(node, self.value, source);
        self.updated += 1;
        Ok(())
    }
}

/// Null-tagged scalars (`~`, `null`, empty) count as null.
fn effective_kind(tree: &YamlTree, node: NodeId) -> NodeKind {
    match tree.scalar(node) {
        Some(scalar) if scalar.tag() == tags::NULL => NodeKind::Null,
        _ => tree.kind(node),
    }
}
