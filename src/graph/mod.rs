//! The graph seen by the walk sampler.
//!
//! The sampler only needs a few read-only queries on a graph: out-neighbours of a node together with
//! edge ids and weights, edge type of an edge, node type of a node and edge lookup from its extremities.
//! These queries are gathered in the trait [WalkGraphT] so that the sampler is written once for
//! directed or undirected, weighted or unweighted graphs.
//!
//! [TypedGraph] is the implementation provided by the crate. It stores out-edges in a compressed row matrix
//! (see the sprs crate), so the out-edges of a node have contiguous ids and are sorted by destination.

pub mod builder;
pub mod csrgraph;
pub mod degrees;

pub use builder::TypedGraphBuilder;
pub use csrgraph::TypedGraph;
pub use degrees::Degree;

/// nodes are identified by their rank in `[0, nb_nodes)`
pub type NodeId = usize;

/// edges are identified by their rank in `[0, nb_edges)`, out-edges of a node have contiguous ids.
pub type EdgeId = usize;

pub type NodeTypeId = u16;

pub type EdgeTypeId = u16;

pub type WeightT = f64;

/// A view on the out-edges of a node.
///
/// destinations and weights are parallel slices, the edge going to `destinations[i]` has id `first_edge + i`.
#[derive(Copy, Clone, Debug)]
pub struct Neighbours<'a> {
    first_edge: EdgeId,
    destinations: &'a [NodeId],
    weights: &'a [WeightT],
}

impl<'a> Neighbours<'a> {
    pub fn new(first_edge: EdgeId, destinations: &'a [NodeId], weights: &'a [WeightT]) -> Self {
        assert_eq!(destinations.len(), weights.len());
        Neighbours {
            first_edge,
            destinations,
            weights,
        }
    }

    /// id of the first out-edge
    pub fn get_first_edge(&self) -> EdgeId {
        self.first_edge
    }

    pub fn get_destinations(&self) -> &'a [NodeId] {
        self.destinations
    }

    pub fn get_weights(&self) -> &'a [WeightT] {
        self.weights
    }

    /// out-degree
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// returns (destination, edge id, weight) of the i-th out-edge
    pub fn get(&self, i: usize) -> (NodeId, EdgeId, WeightT) {
        (self.destinations[i], self.first_edge + i, self.weights[i])
    }

    /// iterates over (destination, edge id, weight)
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, EdgeId, WeightT)> + 'a {
        let first_edge = self.first_edge;
        self.destinations
            .iter()
            .zip(self.weights.iter())
            .enumerate()
            .map(move |(i, (dst, w))| (*dst, first_edge + i, *w))
    }
} // end of impl Neighbours

/// The queries a graph must answer to be walked.
///
/// Implementations must be read-only during a walk batch, walks run in parallel and share the graph.
pub trait WalkGraphT {
    /// number of nodes
    fn get_nb_nodes(&self) -> usize;
    /// number of (directed) edges. An undirected edge counts twice, a selfloop once.
    fn get_nb_edges(&self) -> usize;
    ///
    fn is_directed(&self) -> bool;
    /// true if edge weights were given at construction, otherwise all weights are 1.
    fn is_weighted(&self) -> bool;
    /// out-edges of node. Panics if node is out of range.
    fn get_neighbours(&self, node: NodeId) -> Neighbours<'_>;
    /// id of edge src -> dst if it exists
    fn get_edge_id(&self, src: NodeId, dst: NodeId) -> Option<EdgeId>;
    /// type of an edge, None if the edge has no type
    fn get_edge_type_id(&self, edge: EdgeId) -> Option<EdgeTypeId>;
    /// type of a node, None if the node has no type
    fn get_node_type_id(&self, node: NodeId) -> Option<NodeTypeId>;
    /// true if the graph carries edge types
    fn has_edge_types(&self) -> bool;
    /// true if the graph carries node types
    fn has_node_types(&self) -> bool;

    ///
    fn get_out_degree(&self, node: NodeId) -> usize {
        self.get_neighbours(node).len()
    }

    /// is there an edge src -> dst
    fn has_edge(&self, src: NodeId, dst: NodeId) -> bool {
        self.get_edge_id(src, dst).is_some()
    }
} // end of trait WalkGraphT
