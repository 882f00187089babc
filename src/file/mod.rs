//! File I/O for YAML documents.
//!
//! Loading reads a file (or stdin) into one tree per document; saving emits
//! the trees back with an atomic write and an optional backup.

pub mod loader;
pub mod saver;
