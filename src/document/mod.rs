//! YAML document model: arena nodes, parsing, and emitting.

pub mod emitter;
pub mod node;
pub mod parser;
pub mod tree;
