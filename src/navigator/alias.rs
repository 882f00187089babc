//! Searching merge sources and aliased mappings for a key.
//!
//! Entries are scanned from last to first so that, for `<<: [*a, *b]`, a key
//! defined by both `a` and `b` resolves to `b`'s. The first match (or error)
//! ends the scan.

use super::{AliasTrail, NavigationError, NavigationStrategy, Navigator, PathKey};
use crate::document::node::{NodeId, NodeKind};
use crate::document::tree::YamlTree;
use log::{debug, trace};

/// Records that alias node `alias` is being followed, failing if it already
/// was since the last consumed segment.
pub(crate) fn enter(trail: &mut AliasTrail, alias: NodeId) -> Result<(), NavigationError> {
    if trail.contains(&alias) {
        debug!("alias {} reached twice without consuming a segment", alias);
        return Err(NavigationError::CyclicAlias { alias });
    }
    trail.push(alias);
    Ok(())
}

impl<S: NavigationStrategy + ?Sized> Navigator<'_, S> {
    pub(crate) fn search_aliases(
        &mut self,
        tree: &mut YamlTree,
        map: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
        trail: &mut AliasTrail,
    ) -> Result<bool, NavigationError> {
        let count = tree.entry_count(map);
        for index in (0..count).rev() {
            let Some((_, value)) = tree.entry(map, index) else {
                continue;
            };
            let found = match tree.kind(value) {
                NodeKind::Alias => self.search_alias(tree, value, head, tail, path_stack, trail)?,
                NodeKind::Sequence => {
                    self.search_alias_sequence(tree, value, head, tail, path_stack, trail)?
                }
                _ => false,
            };
            if found {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn search_alias_sequence(
        &mut self,
        tree: &mut YamlTree,
        seq: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
        trail: &mut AliasTrail,
    ) -> Result<bool, NavigationError> {
        let count = tree.item_count(seq);
        for index in (0..count).rev() {
            let Some(item) = tree.item(seq, index) else {
                continue;
            };
            if tree.kind(item) == NodeKind::Alias
                && self.search_alias(tree, item, head, tail, path_stack, trail)?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Looks for `head` in the mapping behind `alias`, including that
    /// mapping's own merge sources.
    fn search_alias(
        &mut self,
        tree: &mut YamlTree,
        alias: NodeId,
        head: &str,
        tail: &[String],
        path_stack: &mut Vec<PathKey>,
        trail: &mut AliasTrail,
    ) -> Result<bool, NavigationError> {
        let Some(target) = tree.alias_target(alias) else {
            return Ok(false);
        };
        enter(trail, alias)?;
        trace!("searching alias {} (node {}) for '{}'", alias, target, head);

        let result = match tree.kind(target) {
            NodeKind::Mapping => {
                self.match_with_alias_fallback(tree, target, head, tail, path_stack, trail)
            }
            _ => Ok(false),
        };
        trail.pop();
        result.map_err(|err| err.through_alias(alias))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{path, RecordingStrategy};
    use super::*;
    use crate::document::node::{YamlScalar, YamlValue};
    use crate::document::parser::parse_yaml;

    #[test]
    fn test_enter_rejects_repeats() {
        let mut trail = AliasTrail::new();
        enter(&mut trail, 4).unwrap();
        enter(&mut trail, 5).unwrap();
        assert_eq!(
            enter(&mut trail, 4),
            Err(NavigationError::CyclicAlias { alias: 4 })
        );
    }

    #[test]
    fn test_nested_merges_resolve() {
        let yaml = "\
base: &base {k: deep}
mid: &mid
  <<: *base
  other: 1
top:
  <<: *mid
";
        let mut tree = parse_yaml(yaml).unwrap();
        let mut strategy = RecordingStrategy::new();
        Navigator::new(&mut strategy)
            .traverse(&mut tree, &path(&["top", "k"]))
            .unwrap();
        assert_eq!(strategy.visits.len(), 1);
        assert_eq!(strategy.visits[0].2, "deep");
        assert_eq!(strategy.visited_paths(), vec!["top.k"]);
    }

    #[test]
    fn test_non_mapping_merge_target_is_skipped() {
        let yaml = "s: &s [1, 2]\nm:\n  <<: *s\n";
        let mut tree = parse_yaml(yaml).unwrap();
        let mut strategy = RecordingStrategy::new();
        Navigator::new(&mut strategy)
            .traverse(&mut tree, &path(&["m", "k"]))
            .unwrap();
        assert!(strategy.visits.is_empty());
    }

    #[test]
    fn test_visit_error_inside_merge_is_wrapped() {
        let yaml = "x: &x {k: bad}\nz:\n  <<: *x\n";
        let mut tree = parse_yaml(yaml).unwrap();
        let mut strategy = RecordingStrategy::new();
        strategy.fail_on = Some("bad".to_string());
        let err = Navigator::new(&mut strategy)
            .traverse(&mut tree, &path(&["z", "k"]))
            .unwrap_err();

        assert!(matches!(err, NavigationError::AliasFailure { .. }));
        assert!(matches!(err.root_cause(), NavigationError::Visit { .. }));
    }

    #[test]
    fn test_self_merge_is_cyclic() {
        // m: &m { <<: *m }
        let mut tree = YamlTree::with_root_kind(NodeKind::Mapping);
        let root = tree.root();
        let m_key = tree.alloc(YamlValue::Scalar(YamlScalar::plain("m")));
        let m = tree.alloc_empty(NodeKind::Mapping);
        tree.push_entry(root, m_key, m);
        let merge_key = tree.alloc(YamlValue::Scalar(YamlScalar::plain("<<")));
        let merge = tree.alloc(YamlValue::Alias(m));
        tree.push_entry(m, merge_key, merge);

        let mut strategy = RecordingStrategy::new();
        let err = Navigator::new(&mut strategy)
            .traverse(&mut tree, &path(&["m", "missing"]))
            .unwrap_err();
        assert_eq!(err.root_cause(), &NavigationError::CyclicAlias { alias: merge });
    }
}
