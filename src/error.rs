//! Error types for axcombine

use crate::model::{NodeId, TreeId};
use thiserror::Error;

/// Result type alias for axcombine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while combining or registering trees
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Duplicate tree id: {0}")]
    DuplicateTreeId(TreeId),

    #[error("Root tree not registered: {0:?}")]
    UnresolvedRoot(TreeId),

    #[error("Cyclic child tree reference: {0}")]
    CyclicTreeReference(TreeId),

    #[error("Invalid tree id: {0:?}")]
    InvalidTreeId(String),

    #[error("Tree already registered: {0}")]
    TreeAlreadyRegistered(TreeId),

    #[error("Unknown tree: {0:?}")]
    UnknownTree(TreeId),

    #[error("Node not in combined tree: {0}")]
    UnknownNode(NodeId),

    #[error("Global node id space exhausted after {0} nodes")]
    IdSpaceExhausted(NodeId),
}

/// Structural problems found when validating a combined tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Tree has nodes but no root")]
    EmptyTree,

    #[error("Root id {root_id} does not match first node {first}")]
    RootMismatch { root_id: NodeId, first: NodeId },

    #[error("Node {0} appears more than once")]
    DuplicateNode(NodeId),

    #[error("Node {parent} lists missing child {child}")]
    MissingChild { parent: NodeId, child: NodeId },

    #[error("Node {child} has two parents: {first} and {second}")]
    Reparented {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },

    #[error("Node {0} is not reachable from the root")]
    Unreachable(NodeId),

    #[error("{source_desc} references missing node {target}")]
    DanglingReference { source_desc: String, target: NodeId },
}
