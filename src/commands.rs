//! The read and write operations behind the command line.
//!
//! These glue the pieces together: parse the path expression, run the
//! navigator with the right strategy over the selected documents, and
//! render what was found.

use crate::config::Config;
use crate::document::emitter::{emit_yaml, to_json};
use crate::document::node::NodeKind;
use crate::document::tree::YamlTree;
use crate::navigator::kind::guess_kind;
use crate::navigator::Navigator;
use crate::path::parse_path;
use crate::strategy::{Match, ReadStrategy, UpdateStrategy};
use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;

/// Which documents of a stream an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSelector {
    All,
    Index(usize),
}

impl Default for DocumentSelector {
    fn default() -> Self {
        DocumentSelector::Index(0)
    }
}

impl FromStr for DocumentSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "*" => Ok(DocumentSelector::All),
            other => other
                .parse()
                .map(DocumentSelector::Index)
                .map_err(|_| format!("'{}' is not a document index or '*'", other)),
        }
    }
}

impl fmt::Display for DocumentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSelector::All => f.write_str("*"),
            DocumentSelector::Index(index) => write!(f, "{}", index),
        }
    }
}

impl DocumentSelector {
    /// Indices of the selected documents among `count`.
    ///
    /// An empty stream counts as one empty document, so index 0 is always
    /// valid.
    pub fn indices(self, count: usize) -> Result<Vec<usize>> {
        let count = count.max(1);
        match self {
            DocumentSelector::All => Ok((0..count).collect()),
            DocumentSelector::Index(index) if index < count => Ok(vec![index]),
            DocumentSelector::Index(index) => {
                bail!("Document index {} out of range ({} document(s))", index, count)
            }
        }
    }
}

/// Nodes a path designated within one document.
#[derive(Debug, Clone)]
pub struct DocumentMatches {
    pub document: usize,
    pub matches: Vec<Match>,
}

/// Finds every node `expr` designates in the selected documents.
///
/// The walk may still coerce scalars it descends through, so the trees
/// should not be saved after a read.
pub fn read_path(
    documents: &mut Vec<YamlTree>,
    expr: &str,
    selector: DocumentSelector,
    config: &Config,
) -> Result<Vec<DocumentMatches>> {
    let path = parse_path(expr).with_context(|| format!("Invalid path '{}'", expr))?;
    if documents.is_empty() {
        documents.push(YamlTree::empty_document());
    }

    let mut results = Vec::new();
    for index in selector.indices(documents.len())? {
        let mut strategy = ReadStrategy::new().with_follow_aliases(config.follow_aliases);
        Navigator::new(&mut strategy)
            .traverse(&mut documents[index], &path)
            .with_context(|| format!("Failed to read '{}' in document {}", expr, index))?;
        log::debug!(
            "document {}: {} match(es) for '{}'",
            index,
            strategy.matches().len(),
            expr
        );
        results.push(DocumentMatches {
            document: index,
            matches: strategy.into_matches(),
        });
    }
    Ok(results)
}

/// Renders matches as YAML (one `---` separated document per match) or as
/// pretty JSON (one value per match).
pub fn format_matches(
    documents: &[YamlTree],
    results: &[DocumentMatches],
    config: &Config,
) -> Result<String> {
    let mut rendered = Vec::new();
    for result in results {
        let tree = &documents[result.document];
        for found in &result.matches {
            if config.output_json {
                let value = to_json(tree, found.node)
                    .with_context(|| format!("Cannot convert {} to JSON", found.path_string()))?;
                let mut text = serde_json::to_string_pretty(&value)?;
                text.push('\n');
                rendered.push(text);
            } else {
                rendered.push(emit_yaml(&tree.extract(found.node), config.indent_size));
            }
        }
    }

    let separator = if config.output_json { "" } else { "---\n" };
    Ok(rendered.join(separator))
}

/// Writes `value` at every node `expr` designates in the selected
/// documents. Returns the number of nodes written.
pub fn write_path(
    documents: &mut Vec<YamlTree>,
    expr: &str,
    value: &YamlTree,
    selector: DocumentSelector,
    config: &Config,
) -> Result<usize> {
    let path = parse_path(expr).with_context(|| format!("Invalid path '{}'", expr))?;
    if documents.is_empty() {
        documents.push(YamlTree::empty_document());
    }

    let mut updated = 0;
    for index in selector.indices(documents.len())? {
        let tree = &mut documents[index];
        if config.auto_create {
            shape_empty_root(tree, &path);
        }
        let mut strategy = UpdateStrategy::from_config(value, config);
        Navigator::new(&mut strategy)
            .traverse(tree, &path)
            .with_context(|| format!("Failed to write '{}' in document {}", expr, index))?;
        updated += strategy.updated();
    }
    log::debug!("wrote {} node(s) for '{}'", updated, expr);
    Ok(updated)
}

/// Gives an empty document the container kind the path needs, the same
/// way the navigator reshapes children on the way down.
fn shape_empty_root(tree: &mut YamlTree, path: &[String]) {
    let root = tree.content_root();
    if path.is_empty() || tree.kind(root) != NodeKind::Null {
        return;
    }
    let fresh = tree.alloc_empty(guess_kind(path, NodeKind::Null));
    tree.set_content_root(fresh);
}
