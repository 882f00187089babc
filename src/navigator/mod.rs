//! Path-driven traversal and mutation of YAML document trees.
//!
//! The [`Navigator`] walks a [`YamlTree`] along a list of path segments and
//! calls its [`NavigationStrategy`] on every node the path designates. Along
//! the way it can reshape the tree so that a write can succeed:
//!
//! - a child whose kind does not fit the rest of the path is emptied into
//!   the right kind in place (see [`kind::guess_kind`]),
//! - missing mapping keys are created when the strategy allows it,
//! - `+` appends a new sequence element.
//!
//! Aliases are transparent: following one consumes no segment. When a key is
//! missing from a mapping, the targets of its alias and merge-key entries are
//! searched from the last entry to the first, so later merge sources override
//! earlier ones and direct keys override both.
//!
//! # Segments
//!
//! - `*` - every child of the current container
//! - `+` - a new element appended to the current sequence
//! - `12` - an index into a sequence
//! - anything else - a mapping key, matched by the strategy
//!
//! # Example
//!
//! ```
//! use yamlnav::document::parser::parse_yaml;
//! use yamlnav::navigator::Navigator;
//! use yamlnav::strategy::ReadStrategy;
//!
//! let mut tree = parse_yaml("a:\n  - b: 1\n  - b: 2\n").unwrap();
//! let mut read = ReadStrategy::new();
//! let path = vec!["a".to_string(), "*".to_string(), "b".to_string()];
//! Navigator::new(&mut read).traverse(&mut tree, &path).unwrap();
//! assert_eq!(read.matches().len(), 2);
//! ```

pub mod alias;
pub mod error;
pub mod kind;
pub mod mapping;
pub mod sequence;
pub mod strategy;

pub use error::NavigationError;
pub use strategy::{render_path, NavigationStrategy, NodeContext, PathKey};

use crate::document::node::{NodeId, NodeKind, YamlValue};
use crate::document::tree::YamlTree;
use kind::{APPEND, SPLAT};
use log::debug;

/// Alias nodes followed since the last consumed path segment.
pub(crate) type AliasTrail = Vec<NodeId>;

/// Walks a document along a path, delegating decisions to a strategy.
pub struct Navigator<'s, S: NavigationStrategy + ?Sized> {
    strategy: &'s mut S,
}

impl<'s, S: NavigationStrategy + ?Sized> Navigator<'s, S> {
    pub fn new(strategy: &'s mut S) -> Self {
        Self { strategy }
    }

    /// Visits every node designated by `path`, starting at the tree root.
    ///
    /// A Document root is unwrapped first. The tree is mutated in place
    /// (coercions, created keys, appended elements) and nothing is rolled
    /// back when an error stops the walk.
    ///
    /// # Errors
    ///
    /// Returns the first [`NavigationError`] raised by index parsing, alias
    /// resolution, or the strategy's visit callback.
    pub fn traverse(&mut self, tree: &mut YamlTree, path: &[String]) -> Result<(), NavigationError> {
        let start = tree.content_root();
        debug!("traversing {:?} from node {}", path, start);
        let mut path_stack = Vec::new();
        self.traverse_node(tree, start, "", path, &mut path_stack)
    }

    /// Visits `node` when the path is exhausted, otherwise descends one
    /// segment further.
    pub(crate) fn traverse_node(
        &mut self,
        tree: &mut YamlTree,
        node: NodeId,
        head: &str,
        path: &[String],
        path_stack: &mut Vec<PathKey>,
    ) -> Result<(), NavigationError> {
        match path.split_first() {
            Some((next, tail)) => {
                debug!("diving into {}", next);
                let mut trail = AliasTrail::new();
                self.recurse(tree, node, next, tail, path_stack, &mut trail)
            }
            None => {
                let ctx = NodeContext::new(head, &[], path_stack);
                self.strategy.visit(tree, node, &ctx)
            }
        }
    }

    fn recurse(
        &mut self,
        tree: &mut YamlTree,
        node: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
        trail: &mut AliasTrail,
    ) -> Result<(), NavigationError> {
        match tree.kind(node) {
            NodeKind::Mapping => {
                debug!("node {} is a mapping with {} entries", node, tree.entry_count(node));
                self.recurse_map(tree, node, head, tail, path_stack, trail)
            }
            NodeKind::Sequence => {
                debug!("node {} is a sequence of {} items", node, tree.item_count(node));
                match head {
                    SPLAT => self.splat_sequence(tree, node, tail, path_stack),
                    APPEND => self.append_sequence(tree, node, tail, path_stack),
                    _ => self.index_sequence(tree, node, head, tail, path_stack),
                }
            }
            NodeKind::Alias => {
                let ctx = NodeContext::new(head, tail, path_stack);
                if !self.strategy.follow_alias(tree, node, &ctx) {
                    debug!("not following alias {}", node);
                    return Ok(());
                }
                let Some(target) = tree.alias_target(node) else {
                    return Ok(());
                };
                debug!("following alias {} to node {}", node, target);
                alias::enter(trail, node)?;
                let result = self.recurse(tree, target, head, tail, path_stack, trail);
                trail.pop();
                result
            }
            NodeKind::Document => match tree.value(node) {
                YamlValue::Document(child) => {
                    let child = *child;
                    self.recurse(tree, child, head, tail, path_stack, trail)
                }
                _ => Ok(()),
            },
            NodeKind::Scalar | NodeKind::Null => {
                debug!("node {} is a {}, nothing to descend into", node, tree.kind(node));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Records every visit and lets tests toggle each policy decision.
    pub struct RecordingStrategy {
        pub follow_alias: bool,
        pub auto_create: bool,
        pub fail_on: Option<String>,
        pub visits: Vec<(Vec<PathKey>, NodeId, String)>,
    }

    impl RecordingStrategy {
        pub fn new() -> Self {
            Self {
                follow_alias: true,
                auto_create: false,
                fail_on: None,
                visits: Vec::new(),
            }
        }

        pub fn visited_paths(&self) -> Vec<String> {
            self.visits.iter().map(|(path, _, _)| render_path(path)).collect()
        }
    }

    impl NavigationStrategy for RecordingStrategy {
        fn should_visit(&self, tree: &YamlTree, key: NodeId, ctx: &NodeContext<'_>) -> bool {
            let key = tree.key_text(key);
            key != "<<" && (ctx.head == "*" || key == ctx.head)
        }

        fn follow_alias(&self, _: &YamlTree, _: NodeId, _: &NodeContext<'_>) -> bool {
            self.follow_alias
        }

        fn auto_create_map(&self, _: &YamlTree, _: NodeId, _: &NodeContext<'_>) -> bool {
            self.auto_create
        }

        fn visit(
            &mut self,
            tree: &mut YamlTree,
            node: NodeId,
            ctx: &NodeContext<'_>,
        ) -> Result<(), NavigationError> {
            let text = tree.scalar_text(node).unwrap_or_default().to_string();
            if self.fail_on.as_deref() == Some(text.as_str()) {
                return Err(NavigationError::Visit {
                    path: render_path(ctx.path_stack),
                    message: format!("refusing {}", text),
                });
            }
            self.visits.push((ctx.path_stack.to_vec(), node, text));
            Ok(())
        }
    }

    pub fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }
}
