//! Ready-made navigation strategies.
//!
//! [`ReadStrategy`] collects what a path designates; [`UpdateStrategy`]
//! writes a value there, creating missing keys on the way. Both match keys
//! with [`KeyMatcher`], which understands `*` globs.

pub mod matcher;
pub mod read;
pub mod update;

pub use matcher::KeyMatcher;
pub use read::{Match, ReadStrategy};
pub use update::UpdateStrategy;
