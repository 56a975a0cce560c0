//! Errors surfaced to the user by store, editor and document operations.
//!
//! Every variant is recoverable: the operation that produced it left the
//! mind map untouched.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MindMapError {
    #[error("cannot add a child to '{0}': node does not exist or is collapsed")]
    InvalidParent(String),
    #[error("the root node cannot be deleted")]
    RootDeletionForbidden,
    #[error("node '{0}' not found")]
    NodeNotFound(String),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl MindMapError {
    /// Stable machine-readable name, used by the script bindings.
    pub fn kind(&self) -> &'static str {
        match self {
            MindMapError::InvalidParent(_) => "invalid_parent",
            MindMapError::RootDeletionForbidden => "root_deletion_forbidden",
            MindMapError::NodeNotFound(_) => "node_not_found",
            MindMapError::MalformedDocument(_) => "malformed_document",
        }
    }
}

pub type Result<T> = std::result::Result<T, MindMapError>;
