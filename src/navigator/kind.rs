//! Node kind guessing and coercion.

use crate::document::node::{NodeId, NodeKind, YamlValue};
use crate::document::tree::YamlTree;
use log::debug;

pub const SPLAT: &str = "*";
pub const APPEND: &str = "+";

/// Parses a sequence index segment: ASCII digits only, no sign.
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Guesses the kind a node must have for the remaining path to descend
/// through it.
///
/// An exhausted path has no opinion and keeps `current`. Aliases are kept so
/// the walker can follow them, and a splat keeps whichever container is
/// already there.
pub fn guess_kind(remaining: &[String], current: NodeKind) -> NodeKind {
    let Some(next) = remaining.first() else {
        return current;
    };

    if current == NodeKind::Alias {
        return current;
    }
    if next == APPEND || parse_index(next).is_some() {
        return NodeKind::Sequence;
    }
    if next == SPLAT {
        return if current.is_container() {
            current
        } else {
            NodeKind::Sequence
        };
    }
    NodeKind::Mapping
}

/// Empties `node` into the `expected` kind unless it already has it.
///
/// The node keeps its id and anchor, so aliases pointing at it stay valid
/// and see the new container.
pub fn coerce(tree: &mut YamlTree, node: NodeId, expected: NodeKind) {
    let actual = tree.kind(node);
    if actual == expected {
        return;
    }
    debug!("wanted {} but node {} was {}, replacing", expected, node, actual);
    *tree.node_mut(node).value_mut() = YamlValue::empty(expected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::YamlScalar;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("1a"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("99999999999999999999999999"), None);
    }

    #[test]
    fn test_guess_kind_empty_path_keeps_current() {
        assert_eq!(guess_kind(&[], NodeKind::Scalar), NodeKind::Scalar);
        assert_eq!(guess_kind(&[], NodeKind::Null), NodeKind::Null);
    }

    #[test]
    fn test_guess_kind_sequence_segments() {
        assert_eq!(guess_kind(&path(&["+"]), NodeKind::Null), NodeKind::Sequence);
        assert_eq!(guess_kind(&path(&["3"]), NodeKind::Mapping), NodeKind::Sequence);
        assert_eq!(guess_kind(&path(&["*"]), NodeKind::Null), NodeKind::Sequence);
        assert_eq!(guess_kind(&path(&["*"]), NodeKind::Scalar), NodeKind::Sequence);
    }

    #[test]
    fn test_guess_kind_splat_keeps_containers() {
        assert_eq!(guess_kind(&path(&["*"]), NodeKind::Mapping), NodeKind::Mapping);
        assert_eq!(guess_kind(&path(&["*"]), NodeKind::Sequence), NodeKind::Sequence);
    }

    #[test]
    fn test_guess_kind_keys_mean_mapping() {
        assert_eq!(guess_kind(&path(&["name"]), NodeKind::Scalar), NodeKind::Mapping);
        assert_eq!(guess_kind(&path(&["a", "0"]), NodeKind::Sequence), NodeKind::Mapping);
    }

    #[test]
    fn test_guess_kind_keeps_alias() {
        assert_eq!(guess_kind(&path(&["name"]), NodeKind::Alias), NodeKind::Alias);
        assert_eq!(guess_kind(&path(&["*"]), NodeKind::Alias), NodeKind::Alias);
        assert_eq!(guess_kind(&path(&["0"]), NodeKind::Alias), NodeKind::Alias);
    }

    #[test]
    fn test_coerce() {
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let scalar = tree.alloc(YamlValue::Scalar(YamlScalar::plain("x")));

        coerce(&mut tree, scalar, NodeKind::Scalar);
        assert_eq!(tree.scalar_text(scalar), Some("x"));

        coerce(&mut tree, scalar, NodeKind::Mapping);
        assert_eq!(tree.kind(scalar), NodeKind::Mapping);
        assert_eq!(tree.entry_count(scalar), 0);
    }

    #[test]
    fn test_coerce_keeps_anchor_and_aliases() {
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let anchored = tree.alloc(YamlValue::Scalar(YamlScalar::plain("1")));
        tree.node_mut(anchored).set_anchor(Some("x".to_string()));
        let alias = tree.alloc(YamlValue::Alias(anchored));

        coerce(&mut tree, anchored, NodeKind::Sequence);
        assert_eq!(tree.anchor(anchored), Some("x"));
        assert_eq!(tree.kind(anchored), NodeKind::Sequence);
        assert_eq!(tree.resolve(alias), Some(anchored));
    }
}
