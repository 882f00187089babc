//! Path expressions driving reads and writes end to end.

use yamlnav::commands::{format_matches, read_path, write_path, DocumentSelector};
use yamlnav::config::Config;
use yamlnav::document::emitter::emit_documents;
use yamlnav::document::parser::{parse_value, parse_yaml_documents};
use yamlnav::path::{parse_path, PathError};

fn read(yaml: &str, expr: &str) -> String {
    let mut docs = parse_yaml_documents(yaml).unwrap();
    let config = Config::default();
    let results = read_path(&mut docs, expr, DocumentSelector::default(), &config).unwrap();
    format_matches(&docs, &results, &config).unwrap()
}

fn write(yaml: &str, expr: &str, value: &str) -> String {
    let mut docs = parse_yaml_documents(yaml).unwrap();
    let value = parse_value(value);
    write_path(
        &mut docs,
        expr,
        &value,
        DocumentSelector::default(),
        &Config::default(),
    )
    .unwrap();
    emit_documents(&docs, 2)
}

#[test]
fn test_bracket_and_dot_index_agree() {
    let yaml = "list:\n  - first\n  - second\n";
    assert_eq!(read(yaml, "list[1]"), "second\n");
    assert_eq!(read(yaml, "list.1"), "second\n");
}

#[test]
fn test_quoted_key_with_dots() {
    let yaml = "hosts:\n  example.com: 443\n  example: 80\n";
    assert_eq!(read(yaml, r#"hosts."example.com""#), "443\n");
    assert_eq!(read(yaml, r#"hosts["example.com"]"#), "443\n");
}

#[test]
fn test_glob_key() {
    let yaml = "app_port: 1\napp_host: h\nother: 2\n";
    assert_eq!(read(yaml, "app_*"), "1\n---\nh\n");
}

#[test]
fn test_read_subtree_inlines_outside_aliases() {
    let yaml = "base: &b {x: 1}\nsvc:\n  conf: *b\n";
    assert_eq!(read(yaml, "svc"), "conf:\n  x: 1\n");
}

#[test]
fn test_write_append_with_bracket() {
    assert_eq!(
        write("tags: [a]\n", "tags[+]", "b"),
        "tags:\n  - a\n  - b\n"
    );
}

#[test]
fn test_write_creates_sequence_for_index() {
    // index 0 on a missing key makes an empty sequence, which has no
    // element 0 to write
    assert_eq!(write("{}\n", "list[0]", "x"), "list: []\n");
}

#[test]
fn test_write_through_anchored_scalar_keeps_aliases_valid() {
    let output = write("a: &x 1\nb: *x\n", "a.c", "5");
    assert!(parse_yaml_documents(&output).is_ok(), "unparseable output:\n{}", output);
    assert_eq!(read(&output, "b.c"), "5\n");
    assert_eq!(read(&output, "a.c"), "5\n");
}

#[test]
fn test_write_mapping_value() {
    assert_eq!(
        write("a: 1\n", "b", "{c: 2, d: [3]}"),
        "a: 1\nb:\n  c: 2\n  d:\n    - 3\n"
    );
}

#[test]
fn test_write_string_that_looks_like_number_stays_quoted() {
    assert_eq!(write("a: 1\n", "a", "\"007\""), "a: \"007\"\n");
}

#[test]
fn test_parse_errors_carry_positions() {
    assert_eq!(
        parse_path("a..b").unwrap_err(),
        PathError::EmptySegment { position: 2 }
    );
    assert_eq!(
        parse_path("a[1").unwrap_err().to_string(),
        "Unexpected end of input, expected ']'"
    );
}
