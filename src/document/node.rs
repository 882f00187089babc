//! YAML node representation for the document arena.
//!
//! A document is stored as a flat arena of `YamlNode`s (see
//! [`YamlTree`](super::tree::YamlTree)). Containers refer to their children by
//! `NodeId`, and an alias is simply a second `NodeId` pointing at the anchored
//! node, so aliases never own what they reference.
//!
//! # Example
//!
//! ```
//! use yamlnav::document::node::{NodeKind, YamlNode, YamlScalar, YamlValue};
//!
//! let node = YamlNode::new(YamlValue::Scalar(YamlScalar::plain("42")));
//! assert_eq!(node.kind(), NodeKind::Scalar);
//! assert_eq!(node.value().as_scalar().unwrap().tag(), "!!int");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Index of a node inside a [`YamlTree`](super::tree::YamlTree) arena.
pub type NodeId = usize;

/// Core schema tags assigned to scalars.
pub mod tags {
    pub const STR: &str = "!!str";
    pub const INT: &str = "!!int";
    pub const FLOAT: &str = "!!float";
    pub const BOOL: &str = "!!bool";
    pub const NULL: &str = "!!null";
}

/// The shape of a node, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Mapping,
    Sequence,
    Scalar,
    Alias,
    Null,
}

impl NodeKind {
    /// Returns true for kinds a path can descend into.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Mapping | NodeKind::Sequence)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Scalar => "scalar",
            NodeKind::Alias => "alias",
            NodeKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A scalar's text together with its resolved tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlScalar {
    text: String,
    tag: String,
}

impl YamlScalar {
    /// Creates a scalar with an explicit tag.
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Creates a scalar whose tag is resolved from its plain text.
    ///
    /// ```
    /// use yamlnav::document::node::YamlScalar;
    ///
    /// assert_eq!(YamlScalar::plain("true").tag(), "!!bool");
    /// assert_eq!(YamlScalar::plain("3.5").tag(), "!!float");
    /// assert_eq!(YamlScalar::plain("hello").tag(), "!!str");
    /// ```
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let tag = resolve_plain_tag(&text);
        Self {
            text,
            tag: tag.to_string(),
        }
    }

    /// Creates a scalar that is always a string, whatever it looks like.
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(text, tags::STR)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_string(&self) -> bool {
        self.tag == tags::STR
    }
}

impl fmt::Display for YamlScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Resolves the core schema tag of an unquoted scalar.
pub fn resolve_plain_tag(text: &str) -> &'static str {
    static INT: OnceLock<Regex> = OnceLock::new();
    static FLOAT: OnceLock<Regex> = OnceLock::new();

    let int = INT.get_or_init(|| {
        Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").expect("static int pattern")
    });
    let float = FLOAT.get_or_init(|| {
        Regex::new(
            r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
        )
        .expect("static float pattern")
    });

    match text {
        "" | "~" | "null" | "Null" | "NULL" => tags::NULL,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => tags::BOOL,
        _ if int.is_match(text) => tags::INT,
        _ if float.is_match(text) => tags::FLOAT,
        _ => tags::STR,
    }
}

/// The content of a single arena node.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    /// Document wrapper holding exactly one root node
    Document(NodeId),
    /// Ordered (key, value) pairs; duplicate keys are allowed
    Mapping(Vec<(NodeId, NodeId)>),
    /// Ordered items
    Sequence(Vec<NodeId>),
    /// A scalar with its tag
    Scalar(YamlScalar),
    /// Non-owning reference to another node
    Alias(NodeId),
    /// Placeholder for content not assigned yet
    Null,
}

impl YamlValue {
    /// Returns the empty value of the given kind.
    ///
    /// Kinds that cannot be empty (documents, aliases) come back as `Null`.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Mapping => YamlValue::Mapping(Vec::new()),
            NodeKind::Sequence => YamlValue::Sequence(Vec::new()),
            NodeKind::Scalar => YamlValue::Scalar(YamlScalar::string("")),
            NodeKind::Document | NodeKind::Alias | NodeKind::Null => YamlValue::Null,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            YamlValue::Document(_) => NodeKind::Document,
            YamlValue::Mapping(_) => NodeKind::Mapping,
            YamlValue::Sequence(_) => NodeKind::Sequence,
            YamlValue::Scalar(_) => NodeKind::Scalar,
            YamlValue::Alias(_) => NodeKind::Alias,
            YamlValue::Null => NodeKind::Null,
        }
    }

    pub fn as_scalar(&self) -> Option<&YamlScalar> {
        match self {
            YamlValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

/// One arena slot: a value plus its optional anchor name.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    pub(crate) value: YamlValue,
    pub(crate) anchor: Option<String>,
}

impl YamlNode {
    pub fn new(value: YamlValue) -> Self {
        Self {
            value,
            anchor: None,
        }
    }

    /// Returns the anchor name if this node has one.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn set_anchor(&mut self, anchor: Option<String>) {
        self.anchor = anchor;
    }

    pub fn value(&self) -> &YamlValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut YamlValue {
        &mut self.value
    }

    pub fn kind(&self) -> NodeKind {
        self.value.kind()
    }
}
