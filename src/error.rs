//! Errors returned by graph construction and walk generation.
//!
//! Io and the executable work with anyhow, library entry points return [WalkError]
//! so that callers can match on the kind of failure.

use crate::graph::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// a walk parameter is out of its domain (weights must be finite and > 0, length and iterations >= 1)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// the graph has no node or no edge
    #[error("empty graph: {0}")]
    EmptyGraph(String),
    /// a start node is not a node of the graph
    #[error("node {0} is not in graph")]
    InvalidNode(NodeId),
    /// inconsistent data given to the graph builder
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
} // end of WalkError

pub type Result<T> = std::result::Result<T, WalkError>;
