//! YAML parsing into the document arena.
//!
//! This module drives `yaml-rust2`'s event parser and builds one `YamlTree`
//! per document. Anchors are recorded on the anchored node and every alias
//! becomes a `YamlValue::Alias` holding the anchored node's id, so a merge key
//! like `<<: *base` is an ordinary mapping entry whose value is an alias.
//!
//! # Example
//!
//! ```
//! use yamlnav::document::node::NodeKind;
//! use yamlnav::document::parser::parse_yaml;
//!
//! let tree = parse_yaml("base: &b {port: 80}\nprod: *b\n").unwrap();
//! let root = tree.content_root();
//! let prod = tree.lookup(root, "prod").unwrap();
//! assert_eq!(tree.kind(prod), NodeKind::Alias);
//! assert_eq!(tree.anchor(tree.alias_target(prod).unwrap()), Some("b"));
//! ```

use super::node::{tags, NodeId, NodeKind, YamlScalar, YamlValue};
use super::tree::YamlTree;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use yaml_rust2::parser::{Event, EventReceiver, Parser, Tag};
use yaml_rust2::scanner::TScalarStyle;

/// Parses a single-document YAML string.
///
/// Empty input yields a document whose content is `Null`. Input with more
/// than one document is rejected; use [`parse_yaml_documents`] for streams.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or holds several documents.
pub fn parse_yaml(yaml: &str) -> Result<YamlTree> {
    let mut documents = parse_yaml_documents(yaml)?;
    match documents.len() {
        0 => Ok(YamlTree::empty_document()),
        1 => Ok(documents.remove(0)),
        n => bail!("Expected a single YAML document, found {}", n),
    }
}

/// Parses a YAML stream into one tree per document.
pub fn parse_yaml_documents(yaml: &str) -> Result<Vec<YamlTree>> {
    let mut builder = TreeBuilder::new(anchor_names(yaml));
    let mut parser = Parser::new_from_str(yaml);
    parser
        .load(&mut builder, true)
        .context("Failed to parse YAML")?;

    if let Some(message) = builder.error {
        return Err(anyhow!(message)).context("Failed to parse YAML");
    }
    debug!("parsed {} document(s)", builder.documents.len());
    Ok(builder.documents)
}

/// Parses a value given on the command line.
///
/// Anything that is not valid YAML, or that is empty, is taken as a plain
/// string so `write` accepts values like `a: b` without quoting games.
pub fn parse_value(text: &str) -> YamlTree {
    match parse_yaml(text) {
        Ok(tree) if !text.trim().is_empty() => tree,
        _ => {
            let mut tree = YamlTree::empty_document();
            let scalar = tree.alloc(YamlValue::Scalar(YamlScalar::string(text)));
            tree.set_content_root(scalar);
            tree
        }
    }
}

/// Collects `&name` anchors in source order.
///
/// The event parser numbers anchors in the order it meets them but does not
/// report their names, so names are recovered from the text and paired with
/// those numbers. When the two disagree the builder falls back to generated
/// names.
fn anchor_names(yaml: &str) -> Vec<String> {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    let anchor = ANCHOR.get_or_init(|| {
        Regex::new(r#"(?m)(?:^|[\s\[{,?:-])&([^\s\[\]{},]+)"#).expect("static anchor pattern")
    });

    yaml.lines()
        .map(|line| strip_comment(line))
        .flat_map(|line| {
            anchor
                .captures_iter(line)
                .map(|caps| caps[1].to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn strip_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut previous = ' ';
    for (idx, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single && previous != '\\' => in_double = !in_double,
            '#' if !in_single && !in_double && previous.is_whitespace() => return &line[..idx],
            _ => {}
        }
        previous = ch;
    }
    line
}

fn render_tag(tag: &Tag) -> String {
    if tag.handle == "!!" || tag.handle == "tag:yaml.org,2002:" {
        format!("!!{}", tag.suffix)
    } else {
        format!("{}{}", tag.handle, tag.suffix)
    }
}

enum Frame {
    Sequence(NodeId),
    Mapping {
        node: NodeId,
        pending_key: Option<NodeId>,
    },
}

struct TreeBuilder {
    names: Vec<String>,
    documents: Vec<YamlTree>,
    current: Option<YamlTree>,
    stack: Vec<Frame>,
    anchors: HashMap<usize, NodeId>,
    error: Option<String>,
}

impl TreeBuilder {
    fn new(names: Vec<String>) -> Self {
        Self {
            names,
            documents: Vec::new(),
            current: None,
            stack: Vec::new(),
            anchors: HashMap::new(),
            error: None,
        }
    }

    fn anchor_name(&self, anchor_id: usize) -> String {
        self.names
            .get(anchor_id - 1)
            .cloned()
            .unwrap_or_else(|| format!("anchor{}", anchor_id))
    }

    /// Allocates a node and attaches it to the innermost open container.
    fn add(&mut self, value: YamlValue, anchor_id: usize) -> NodeId {
        let name = (anchor_id > 0).then(|| self.anchor_name(anchor_id));
        let tree = self.current.get_or_insert_with(YamlTree::empty_document);
        let id = tree.alloc(value);
        if let Some(name) = name {
            tree.node_mut(id).set_anchor(Some(name));
            self.anchors.insert(anchor_id, id);
        }

        match self.stack.last_mut() {
            None => tree.set_content_root(id),
            Some(Frame::Sequence(seq)) => tree.push_item(*seq, id),
            Some(Frame::Mapping { node, pending_key }) => match pending_key.take() {
                None => *pending_key = Some(id),
                Some(key) => tree.push_entry(*node, key, id),
            },
        }
        id
    }

    fn scalar(text: String, style: TScalarStyle, tag: Option<Tag>) -> YamlScalar {
        match (tag, style) {
            (Some(tag), _) => YamlScalar::new(text, render_tag(&tag)),
            (None, TScalarStyle::Plain) => YamlScalar::plain(text),
            (None, _) => YamlScalar::new(text, tags::STR),
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        trace!("event {:?}", event);

        match event {
            Event::DocumentStart { .. } => {
                self.current = Some(YamlTree::empty_document());
                self.anchors.clear();
            }
            Event::DocumentEnd { .. } => {
                if let Some(tree) = self.current.take() {
                    self.documents.push(tree);
                }
            }
            Event::Scalar(text, style, anchor_id, tag) => {
                let scalar = Self::scalar(text, style, tag);
                self.add(YamlValue::Scalar(scalar), anchor_id);
            }
            Event::SequenceStart(anchor_id, _) => {
                let id = self.add(YamlValue::empty(NodeKind::Sequence), anchor_id);
                self.stack.push(Frame::Sequence(id));
            }
            Event::MappingStart(anchor_id, _) => {
                let id = self.add(YamlValue::empty(NodeKind::Mapping), anchor_id);
                self.stack.push(Frame::Mapping {
                    node: id,
                    pending_key: None,
                });
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.stack.pop();
            }
            Event::Alias(anchor_id) => match self.anchors.get(&anchor_id).copied() {
                Some(target) => {
                    self.add(YamlValue::Alias(target), 0);
                }
                None => {
                    self.error = Some(format!("Unknown anchor id {}", anchor_id));
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_mapping() {
        let tree = parse_yaml("name: Alice\nage: 30\n").unwrap();
        let root = tree.content_root();
        assert_eq!(tree.kind(root), NodeKind::Mapping);
        assert_eq!(tree.entry_count(root), 2);

        let age = tree.lookup(root, "age").unwrap();
        assert_eq!(tree.scalar(age).unwrap().tag(), tags::INT);
    }

    #[test]
    fn test_parse_quoted_scalar_is_string() {
        let tree = parse_yaml("version: \"1.0\"").unwrap();
        let version = tree.lookup(tree.content_root(), "version").unwrap();
        assert_eq!(tree.scalar(version).unwrap().tag(), tags::STR);
    }

    #[test]
    fn test_parse_explicit_tag() {
        let tree = parse_yaml("port: !!str 8080").unwrap();
        let port = tree.lookup(tree.content_root(), "port").unwrap();
        assert_eq!(tree.scalar(port).unwrap().tag(), tags::STR);
    }

    #[test]
    fn test_parse_empty_input() {
        let tree = parse_yaml("").unwrap();
        assert_eq!(tree.kind(tree.content_root()), NodeKind::Null);
    }

    #[test]
    fn test_parse_anchor_names() {
        let yaml = "a: &first 1\nb: &second [x]\nc: *second\n";
        let tree = parse_yaml(yaml).unwrap();
        let root = tree.content_root();
        let a = tree.lookup(root, "a").unwrap();
        let b = tree.lookup(root, "b").unwrap();
        let c = tree.lookup(root, "c").unwrap();
        assert_eq!(tree.anchor(a), Some("first"));
        assert_eq!(tree.anchor(b), Some("second"));
        assert_eq!(tree.alias_target(c), Some(b));
    }

    #[test]
    fn test_parse_duplicate_keys_are_kept() {
        let tree = parse_yaml("{a: 1, a: 2}").unwrap();
        assert_eq!(tree.entry_count(tree.content_root()), 2);
    }

    #[test]
    fn test_parse_multiple_documents() {
        let docs = parse_yaml_documents("a: 1\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert!(parse_yaml("a: 1\n---\nb: 2\n").is_err());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(parse_yaml("a: [1, 2").is_err());
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        let tree = parse_value("{unclosed");
        assert_eq!(tree.scalar_text(tree.content_root()), Some("{unclosed"));

        let tree = parse_value("[1, 2]");
        assert_eq!(tree.kind(tree.content_root()), NodeKind::Sequence);
    }

    #[test]
    fn test_anchor_names_skip_comments() {
        let names = anchor_names("a: &x 1 # &not\nb: '&quoted'\n");
        assert_eq!(names, vec!["x".to_string()]);
    }
}
