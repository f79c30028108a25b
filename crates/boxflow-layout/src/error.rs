//! Error types for boxflow-layout.

use crate::node::NodeId;
use thiserror::Error;

/// Result alias for fallible tree operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Usage errors reported to the host.
///
/// Numeric degeneracies never surface here; the algorithm recovers from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Handle does not refer to a live node.
    #[error("invalid node handle {0}")]
    InvalidNode(NodeId),

    /// A measure function was assigned to a node that has children.
    #[error("node {0} has children and cannot take a measure function")]
    MeasuredNodeWithChildren(NodeId),

    /// A child was inserted under a node with a measure function.
    #[error("node {0} has a measure function and cannot take children")]
    ChildOfMeasuredNode(NodeId),

    /// The child is already attached elsewhere.
    #[error("node {child} is already owned by {owner}")]
    AlreadyOwned {
        /// The node being inserted
        child: NodeId,
        /// Its current owner
        owner: NodeId,
    },

    /// Insert or lookup past the end of the child list.
    #[error("child index {index} out of bounds for node {owner} with {len} children")]
    ChildIndexOutOfBounds {
        /// The owner
        owner: NodeId,
        /// Requested index
        index: usize,
        /// Current child count
        len: usize,
    },

    /// A node cannot become its own descendant.
    #[error("inserting {child} under {owner} would create a cycle")]
    Cycle {
        /// The node being inserted
        child: NodeId,
        /// The prospective owner
        owner: NodeId,
    },

    /// Configuration could not be parsed.
    #[error("invalid layout config: {0}")]
    Config(String),
}
