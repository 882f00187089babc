//! yamlnav - path-driven YAML query and edit tool.
//!
//! Documents are parsed into an arena ([`document::tree::YamlTree`]) and
//! walked by the [`navigator::Navigator`], which follows anchors, aliases
//! and `<<` merge keys transparently and can create missing structure when
//! writing. What happens at each designated node is decided by a
//! [`navigator::NavigationStrategy`]; the [`strategy`] module has the read
//! and update ones the command line uses.

pub mod commands;
pub mod config;
pub mod document;
pub mod file;
pub mod navigator;
pub mod path;
pub mod strategy;
