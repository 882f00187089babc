//! Error types for path navigation.

use crate::document::node::NodeId;
use thiserror::Error;

/// Errors that abort a traversal.
///
/// "Nothing matched" is never an error: a walk that finds no node simply
/// returns `Ok(())` without calling the visit callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A sequence segment is not a non-negative base-10 integer.
    #[error("Invalid sequence index '{segment}'")]
    InvalidIndex { segment: String },

    /// The terminal visit callback rejected the node at `path`.
    #[error("Cannot update '{path}': {message}")]
    Visit { path: String, message: String },

    /// An error raised while searching the target of alias node `alias`.
    #[error("Error while resolving alias (node {alias}): {source}")]
    AliasFailure {
        alias: NodeId,
        #[source]
        source: Box<NavigationError>,
    },

    /// Alias node `alias` was reached again before any path segment was
    /// consumed.
    #[error("Cyclic alias detected at node {alias}")]
    CyclicAlias { alias: NodeId },
}

impl NavigationError {
    /// Wraps an error coming out of an alias target, keeping the innermost
    /// alias as the reported one.
    pub(crate) fn through_alias(self, alias: NodeId) -> Self {
        match self {
            NavigationError::AliasFailure { .. } => self,
            other => NavigationError::AliasFailure {
                alias,
                source: Box::new(other),
            },
        }
    }

    /// Returns the error with any alias wrapping removed.
    pub fn root_cause(&self) -> &NavigationError {
        match self {
            NavigationError::AliasFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
