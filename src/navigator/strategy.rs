//! The policy interface the navigator consults while walking.

use super::error::NavigationError;
use crate::document::node::NodeId;
use crate::document::tree::YamlTree;
use std::fmt;

/// One concrete step of a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(key) => f.write_str(key),
            PathKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Renders a path stack the way a user would type it, e.g. `a.b[0].c`.
pub fn render_path(path: &[PathKey]) -> String {
    let mut out = String::new();
    for key in path {
        match key {
            PathKey::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                if key.contains(['.', '[', ']', '"']) {
                    out.push_str(&format!("{:?}", key));
                } else {
                    out.push_str(key);
                }
            }
            PathKey::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}

/// Where the walk currently is: the segment being matched, what is left
/// after it, and the concrete keys resolved so far.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub head: &'a str,
    pub tail: &'a [String],
    pub path_stack: &'a [PathKey],
}

impl<'a> NodeContext<'a> {
    pub fn new(head: &'a str, tail: &'a [String], path_stack: &'a [PathKey]) -> Self {
        Self {
            head,
            tail,
            path_stack,
        }
    }
}

/// Decisions delegated by the navigator.
///
/// Implementations may be called many times per traversal: forward over a
/// mapping's entries for direct matches, backward over merge sources.
pub trait NavigationStrategy {
    /// Does the mapping key `key` match the current segment?
    fn should_visit(&self, tree: &YamlTree, key: NodeId, ctx: &NodeContext<'_>) -> bool;

    /// Should alias indirection at `node` be followed or searched?
    fn follow_alias(&self, tree: &YamlTree, node: NodeId, ctx: &NodeContext<'_>) -> bool;

    /// May a missing key be created in mapping `node`?
    fn auto_create_map(&self, tree: &YamlTree, node: NodeId, ctx: &NodeContext<'_>) -> bool;

    /// Terminal action on a fully resolved node. `ctx.tail` is always empty.
    fn visit(
        &mut self,
        tree: &mut YamlTree,
        node: NodeId,
        ctx: &NodeContext<'_>,
    ) -> Result<(), NavigationError>;
}
