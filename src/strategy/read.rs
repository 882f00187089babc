//! Collecting the nodes a path designates.

use super::matcher::KeyMatcher;
use crate::document::node::NodeId;
use crate::document::tree::YamlTree;
use crate::navigator::{render_path, NavigationError, NavigationStrategy, NodeContext, PathKey};

/// One node designated by a path, with the concrete keys leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub path: Vec<PathKey>,
    pub node: NodeId,
}

impl Match {
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }
}

/// Read-only strategy: never creates keys, records every visited node.
#[derive(Debug)]
pub struct ReadStrategy {
    matcher: KeyMatcher,
    follow_aliases: bool,
    matches: Vec<Match>,
}

impl Default for ReadStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadStrategy {
    pub fn new() -> Self {
        Self {
            matcher: KeyMatcher::new(),
            follow_aliases: true,
            matches: Vec::new(),
        }
    }

    pub fn with_follow_aliases(mut self, follow_aliases: bool) -> Self {
        self.follow_aliases = follow_aliases;
        self
    }

    /// Matches in visit order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}

impl NavigationStrategy for ReadStrategy {
    fn should_visit(&self, tree: &YamlTree, key: NodeId, ctx: &NodeContext<'_>) -> bool {
        self.matcher.matches(ctx.head, &tree.key_text(key))
    }

    fn follow_alias(&self, _tree: &YamlTree, _node: NodeId, _ctx: &NodeContext<'_>) -> bool {
        self.follow_aliases
    }

    fn auto_create_map(&self, _tree: &YamlTree, _node: NodeId, _ctx: &NodeContext<'_>) -> bool {
        false
    }

    fn visit(
        &mut self,
        _tree: &mut YamlTree,
        node: NodeId,
        ctx: &NodeContext<'_>,
    ) -> Result<(), NavigationError> {
        self.matches.push(Match {
            path: ctx.path_stack.to_vec(),
            node,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;
    use crate::navigator::Navigator;

    fn read(yaml: &str, path: &[&str]) -> (YamlTree, Vec<Match>) {
        let mut tree = parse_yaml(yaml).unwrap();
        let mut strategy = ReadStrategy::new();
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        Navigator::new(&mut strategy).traverse(&mut tree, &path).unwrap();
        (tree, strategy.into_matches())
    }

    #[test]
    fn test_read_never_creates() {
        let (tree, matches) = read("a: 1\n", &["b", "c"]);
        assert!(matches.is_empty());
        assert_eq!(tree.entry_count(tree.content_root()), 1);
    }

    #[test]
    fn test_glob_keys() {
        let (tree, matches) = read("apple: 1\napricot: 2\nbanana: 3\n", &["ap*"]);
        let texts: Vec<_> = matches
            .iter()
            .map(|m| tree.scalar_text(m.node).unwrap())
            .collect();
        assert_eq!(texts, vec!["1", "2"]);
        assert_eq!(matches[1].path_string(), "apricot");
    }

    #[test]
    fn test_splat_skips_merge_key() {
        let (_, matches) = read("base: &b {x: 1}\nc:\n  <<: *b\n  y: 2\n", &["c", "*"]);
        let paths: Vec<_> = matches.iter().map(Match::path_string).collect();
        assert_eq!(paths, vec!["c.y"]);
    }

    #[test]
    fn test_aliases_can_be_ignored() {
        let mut tree = parse_yaml("base: &b {x: 1}\nc:\n  <<: *b\n").unwrap();
        let mut strategy = ReadStrategy::new().with_follow_aliases(false);
        let path = vec!["c".to_string(), "x".to_string()];
        Navigator::new(&mut strategy).traverse(&mut tree, &path).unwrap();
        assert!(strategy.matches().is_empty());
    }
}
