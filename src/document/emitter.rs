//! YAML and JSON output for document trees.
//!
//! The emitter writes block-style YAML. Anchors and aliases are written as
//! `&name` / `*name`, so shared structure survives a load/save round trip.
//! Comments and original layout are not preserved.
//!
//! # Example
//!
//! ```
//! use yamlnav::document::emitter::emit_yaml;
//! use yamlnav::document::parser::parse_yaml;
//!
//! let tree = parse_yaml("a: {b: [1, 2]}").unwrap();
//! assert_eq!(emit_yaml(&tree, 2), "a:\n  b:\n    - 1\n    - 2\n");
//! ```

use super::node::{resolve_plain_tag, tags, NodeId, YamlScalar, YamlValue};
use super::tree::YamlTree;
use anyhow::{bail, Result};
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::HashMap;

/// Renders one document as block YAML.
pub fn emit_yaml(tree: &YamlTree, indent: usize) -> String {
    let emitter = Emitter::new(tree, indent.max(1));
    let mut out = String::new();
    emitter.write_root(&mut out, tree.content_root());
    out
}

/// Renders several documents separated by `---`.
pub fn emit_documents(trees: &[YamlTree], indent: usize) -> String {
    trees
        .iter()
        .map(|tree| emit_yaml(tree, indent))
        .collect::<Vec<_>>()
        .join("---\n")
}

struct Emitter<'a> {
    tree: &'a YamlTree,
    indent: usize,
    anchors: HashMap<NodeId, String>,
}

impl<'a> Emitter<'a> {
    fn new(tree: &'a YamlTree, indent: usize) -> Self {
        let mut anchors: HashMap<NodeId, String> = (0..tree.len())
            .filter_map(|id| tree.anchor(id).map(|name| (id, name.to_string())))
            .collect();

        // Alias targets built programmatically may lack a name.
        for id in 0..tree.len() {
            if let Some(target) = tree.alias_target(id) {
                anchors
                    .entry(target)
                    .or_insert_with(|| format!("anchor{}", target));
            }
        }

        Self {
            tree,
            indent,
            anchors,
        }
    }

    fn write_root(&self, out: &mut String, id: NodeId) {
        if self.is_block(id) {
            if let Some(anchor) = self.anchors.get(&id) {
                out.push_str(&format!("&{}\n", anchor));
            }
            self.write_block(out, id, 0);
        } else {
            out.push_str(&self.inline(id));
            out.push('\n');
        }
    }

    /// Non-empty mappings and sequences are written in block style.
    fn is_block(&self, id: NodeId) -> bool {
        match self.tree.value(id) {
            YamlValue::Mapping(entries) => !entries.is_empty(),
            YamlValue::Sequence(items) => !items.is_empty(),
            YamlValue::Document(child) => self.is_block(*child),
            YamlValue::Scalar(_) | YamlValue::Alias(_) | YamlValue::Null => false,
        }
    }

    fn anchor_prefix(&self, id: NodeId) -> String {
        self.anchors
            .get(&id)
            .map(|name| format!("&{} ", name))
            .unwrap_or_default()
    }

    /// Writes a block container whose lines start at column `col`.
    fn write_block(&self, out: &mut String, id: NodeId, col: usize) {
        let pad = " ".repeat(col);
        match self.tree.value(id) {
            YamlValue::Mapping(entries) => {
                for (key, value) in entries {
                    out.push_str(&pad);
                    out.push_str(&self.key(*key));
                    out.push(':');
                    self.write_child(out, *value, col + self.indent);
                }
            }
            YamlValue::Sequence(items) => {
                for item in items {
                    out.push_str(&pad);
                    out.push('-');
                    self.write_item(out, *item, col);
                }
            }
            YamlValue::Document(child) => self.write_block(out, *child, col),
            YamlValue::Scalar(_) | YamlValue::Alias(_) | YamlValue::Null => {
                out.push_str(&pad);
                out.push_str(&self.inline(id));
                out.push('\n');
            }
        }
    }

    /// Writes the value half of `key:`.
    fn write_child(&self, out: &mut String, id: NodeId, col: usize) {
        if self.is_block(id) {
            if let Some(anchor) = self.anchors.get(&id) {
                out.push_str(&format!(" &{}", anchor));
            }
            out.push('\n');
            self.write_block(out, id, col);
        } else {
            out.push(' ');
            out.push_str(&self.inline(id));
            out.push('\n');
        }
    }

    /// Writes the remainder of a `-` line; nested blocks start two columns in.
    fn write_item(&self, out: &mut String, id: NodeId, col: usize) {
        if !self.is_block(id) {
            out.push(' ');
            out.push_str(&self.inline(id));
            out.push('\n');
            return;
        }

        let nested_col = col + 2;
        if let Some(anchor) = self.anchors.get(&id) {
            out.push_str(&format!(" &{}\n", anchor));
            self.write_block(out, id, nested_col);
            return;
        }

        let mut nested = String::new();
        self.write_block(&mut nested, id, nested_col);
        out.push(' ');
        out.push_str(&nested[nested_col..]);
    }

    fn key(&self, key: NodeId) -> String {
        match self.tree.value(key) {
            YamlValue::Scalar(_) | YamlValue::Alias(_) | YamlValue::Null => self.inline(key),
            _ => format!("? {}", self.flow(key)),
        }
    }

    fn inline(&self, id: NodeId) -> String {
        match self.tree.value(id) {
            YamlValue::Alias(target) => match self.anchors.get(target) {
                Some(name) => format!("*{}", name),
                None => "null".to_string(),
            },
            YamlValue::Mapping(_) | YamlValue::Sequence(_) | YamlValue::Document(_) => {
                format!("{}{}", self.anchor_prefix(id), self.flow(id))
            }
            YamlValue::Scalar(scalar) => {
                format!("{}{}", self.anchor_prefix(id), format_scalar(scalar))
            }
            YamlValue::Null => format!("{}null", self.anchor_prefix(id)),
        }
    }

    fn flow(&self, id: NodeId) -> String {
        match self.tree.value(id) {
            YamlValue::Mapping(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", self.flow(*k), self.flow(*v)))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            YamlValue::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(|item| self.flow(*item)).collect();
                format!("[{}]", parts.join(", "))
            }
            YamlValue::Document(child) => self.flow(*child),
            YamlValue::Scalar(_) | YamlValue::Alias(_) | YamlValue::Null => self.inline(id),
        }
    }
}

/// Formats a scalar so that reading it back yields the same text and tag.
pub fn format_scalar(scalar: &YamlScalar) -> String {
    let text = scalar.text();
    let tag = scalar.tag();
    let core = [tags::STR, tags::INT, tags::FLOAT, tags::BOOL, tags::NULL];

    if !core.contains(&tag) {
        let body = if is_plain_safe(text) {
            text.to_string()
        } else {
            double_quote(text)
        };
        return format!("{} {}", tag, body);
    }
    if tag == tags::NULL && text.is_empty() {
        return "null".to_string();
    }

    let plain_ok = is_plain_safe(text);
    if plain_ok && resolve_plain_tag(text) == tag {
        text.to_string()
    } else if tag == tags::STR {
        double_quote(text)
    } else if plain_ok {
        format!("{} {}", tag, text)
    } else {
        format!("{} {}", tag, double_quote(text))
    }
}

fn is_plain_safe(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) && text.len() == 1 {
        return false;
    }
    if "[]{},#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if (first == '-' || first == '?' || first == ':') && text[1..].starts_with(' ') {
        return false;
    }
    if text.starts_with(' ') || text.ends_with(' ') || text.ends_with(':') {
        return false;
    }
    !(text.contains(": ")
        || text.contains(" #")
        || text.contains('\n')
        || text.contains('\t')
        || text.chars().any(char::is_control))
}

fn double_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Converts a node to JSON, following aliases.
///
/// # Errors
///
/// Fails when an alias leads back into a node that is already being
/// converted, since the result would be infinite.
pub fn to_json(tree: &YamlTree, id: NodeId) -> Result<JsonValue> {
    let mut trail = Vec::new();
    json_value(tree, id, &mut trail)
}

fn json_value(tree: &YamlTree, id: NodeId, trail: &mut Vec<NodeId>) -> Result<JsonValue> {
    if trail.contains(&id) {
        bail!("Cannot convert cyclic alias structure to JSON");
    }
    trail.push(id);

    let value = match tree.value(id) {
        YamlValue::Document(child) => json_value(tree, *child, trail)?,
        YamlValue::Alias(target) => json_value(tree, *target, trail)?,
        YamlValue::Mapping(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                let key = match tree.resolve(*key).and_then(|k| tree.scalar_text(k)) {
                    Some(text) => text.to_string(),
                    None => json_value(tree, *key, trail)?.to_string(),
                };
                map.insert(key, json_value(tree, *value, trail)?);
            }
            JsonValue::Object(map)
        }
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| json_value(tree, *item, trail))
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Scalar(scalar) => json_scalar(scalar),
        YamlValue::Null => JsonValue::Null,
    };

    trail.pop();
    Ok(value)
}

fn json_scalar(scalar: &YamlScalar) -> JsonValue {
    let text = scalar.text();
    match scalar.tag() {
        tags::NULL => JsonValue::Null,
        tags::BOOL => JsonValue::Bool(text.eq_ignore_ascii_case("true")),
        tags::INT => match parse_int(text) {
            Some(n) => JsonValue::Number(n.into()),
            None => JsonValue::String(text.to_string()),
        },
        tags::FLOAT => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(text.to_string())),
        _ => JsonValue::String(text.to_string()),
    }
}

fn parse_int(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(octal) = text.strip_prefix("0o") {
        i64::from_str_radix(octal, 8).ok()
    } else {
        text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;

    #[test]
    fn test_emit_nested_mapping() {
        let tree = parse_yaml("a:\n  b: 1\n  c: text\n").unwrap();
        assert_eq!(emit_yaml(&tree, 2), "a:\n  b: 1\n  c: text\n");
    }

    #[test]
    fn test_emit_sequence_of_mappings() {
        let tree = parse_yaml("- name: a\n  size: 1\n- name: b\n").unwrap();
        assert_eq!(
            emit_yaml(&tree, 2),
            "- name: a\n  size: 1\n- name: b\n"
        );
    }

    #[test]
    fn test_emit_sequence_of_mappings_with_wide_indent() {
        let tree = parse_yaml("items:\n- name: a\n  size: 1\n").unwrap();
        let text = emit_yaml(&tree, 4);
        assert_eq!(text, "items:\n    - name: a\n      size: 1\n");
        assert!(parse_yaml(&text).is_ok());
    }

    #[test]
    fn test_emit_empty_containers() {
        let tree = parse_yaml("a: {}\nb: []\nc:\n").unwrap();
        assert_eq!(emit_yaml(&tree, 2), "a: {}\nb: []\nc: null\n");
    }

    #[test]
    fn test_emit_anchors_and_aliases() {
        let yaml = "base: &b\n  x: 1\nother: *b\n";
        let tree = parse_yaml(yaml).unwrap();
        assert_eq!(emit_yaml(&tree, 2), yaml);
    }

    #[test]
    fn test_emit_quotes_ambiguous_strings() {
        assert_eq!(format_scalar(&YamlScalar::string("123")), "\"123\"");
        assert_eq!(format_scalar(&YamlScalar::string("true")), "\"true\"");
        assert_eq!(format_scalar(&YamlScalar::string("a: b")), "\"a: b\"");
        assert_eq!(format_scalar(&YamlScalar::string("")), "\"\"");
        assert_eq!(format_scalar(&YamlScalar::string("line\nbreak")), "\"line\\nbreak\"");
        assert_eq!(format_scalar(&YamlScalar::string("plain text")), "plain text");
        assert_eq!(format_scalar(&YamlScalar::plain("42")), "42");
    }

    #[test]
    fn test_emit_custom_tag() {
        let scalar = YamlScalar::new("abc", "!custom");
        assert_eq!(format_scalar(&scalar), "!custom abc");
    }

    #[test]
    fn test_emit_multiple_documents() {
        let docs = vec![parse_yaml("a: 1").unwrap(), parse_yaml("b: 2").unwrap()];
        assert_eq!(emit_documents(&docs, 2), "a: 1\n---\nb: 2\n");
    }

    #[test]
    fn test_to_json_follows_aliases() {
        let tree = parse_yaml("base: &b {x: 1, ok: true}\ncopy: *b\nname: null\n").unwrap();
        let json = to_json(&tree, tree.content_root()).unwrap();
        assert_eq!(json["copy"]["x"], serde_json::json!(1));
        assert_eq!(json["copy"]["ok"], serde_json::json!(true));
        assert!(json["name"].is_null());
    }
}
