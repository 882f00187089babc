//! Path expressions: the user-facing syntax for addressing nodes.
//!
//! An expression is split into plain segments which the navigator then
//! interprets (`*` splat, `+` append, digits index, anything else a key).
//!
//! # Supported Syntax
//!
//! - `a.b.c` - nested keys
//! - `a[0]` or `a.0` - sequence index
//! - `a[*]` or `a.*` - every child
//! - `a[+]` - append to a sequence
//! - `a."b.c"` or `a["b.c"]` - keys containing dots or brackets
//! - `a.ab*` - glob key, matched by the strategy
//!
//! A leading `.` is optional and an empty expression addresses the document
//! root.
//!
//! # Examples
//!
//! ```
//! use yamlnav::path::parse_path;
//!
//! assert_eq!(parse_path("a.b[0]").unwrap(), vec!["a", "b", "0"]);
//! assert_eq!(parse_path(r#"a."b.c""#).unwrap(), vec!["a", "b.c"]);
//! ```

pub mod error;
pub mod parser;

pub use error::PathError;
pub use parser::{parse_path, Parser};
