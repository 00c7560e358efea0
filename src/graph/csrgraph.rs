//! A typed graph stored as a compressed row matrix.
//!
//! Row i of the matrix holds the out-edges of node i, column indices are destinations (sorted) and
//! values are edge weights. The rank of an entry in the matrix data is the edge id, so
//! edge types are stored in a vector parallel to the matrix data.

use indexmap::IndexSet;
use sprs::CsMatI;

use super::degrees::{get_csmat_degrees, Degree};
use super::*;

/// A read-only typed graph. Built with [TypedGraphBuilder](super::TypedGraphBuilder).
pub struct TypedGraph {
    /// out-edges, mat[[i,j]] is the weight of edge i -> j
    csrmat: CsMatI<WeightT, usize>,
    ///
    directed: bool,
    /// false if all weights were defaulted to 1.
    weighted: bool,
    /// edge types indexed by edge id, None if graph has no edge types
    edge_types: Option<Vec<Option<EdgeTypeId>>>,
    /// node types indexed by node id, None if graph has no node types
    node_types: Option<Vec<Option<NodeTypeId>>>,
    /// names of edge types, rank in set is the edge type id
    edge_type_names: IndexSet<String>,
    /// names of node types, rank in set is the node type id
    node_type_names: IndexSet<String>,
} // end of struct TypedGraph

impl TypedGraph {
    pub(crate) fn new(
        csrmat: CsMatI<WeightT, usize>,
        directed: bool,
        weighted: bool,
        edge_types: Option<Vec<Option<EdgeTypeId>>>,
        node_types: Option<Vec<Option<NodeTypeId>>>,
        edge_type_names: IndexSet<String>,
        node_type_names: IndexSet<String>,
    ) -> Self {
        assert!(csrmat.is_csr());
        if let Some(types) = &edge_types {
            assert_eq!(types.len(), csrmat.nnz());
        }
        if let Some(types) = &node_types {
            assert_eq!(types.len(), csrmat.rows());
        }
        TypedGraph {
            csrmat,
            directed,
            weighted,
            edge_types,
            node_types,
            edge_type_names,
            node_type_names,
        }
    } // end of new

    /// get the underlying compressed row matrix
    pub fn get_csrmat(&self) -> &CsMatI<WeightT, usize> {
        &self.csrmat
    }

    /// number of distinct edge types
    pub fn get_nb_edge_types(&self) -> usize {
        self.edge_type_names.len()
    }

    /// number of distinct node types
    pub fn get_nb_node_types(&self) -> usize {
        self.node_type_names.len()
    }

    /// name of edge type
    pub fn get_edge_type_name(&self, edge_type: EdgeTypeId) -> Option<&str> {
        self.edge_type_names
            .get_index(edge_type as usize)
            .map(|s| s.as_str())
    }

    /// name of node type
    pub fn get_node_type_name(&self, node_type: NodeTypeId) -> Option<&str> {
        self.node_type_names
            .get_index(node_type as usize)
            .map(|s| s.as_str())
    }

    /// id of an edge type given its name
    pub fn get_edge_type_id_by_name(&self, name: &str) -> Option<EdgeTypeId> {
        self.edge_type_names
            .get_index_of(name)
            .map(|i| i as EdgeTypeId)
    }

    /// id of a node type given its name
    pub fn get_node_type_id_by_name(&self, name: &str) -> Option<NodeTypeId> {
        self.node_type_names
            .get_index_of(name)
            .map(|i| i as NodeTypeId)
    }

    /// in and out degrees of each node, selfloops excluded
    pub fn get_degrees(&self) -> Vec<Degree> {
        get_csmat_degrees(&self.csrmat)
    }

    /// nodes with no out-edge. A walk reaching one of these stops there.
    pub fn get_trap_nodes(&self) -> Vec<NodeId> {
        (0..self.get_nb_nodes())
            .filter(|node| self.csrmat.indptr().nnz_in_outer_sz(*node) == 0)
            .collect()
    }

    /// source and destination of an edge
    pub fn get_edge_extremities(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        if edge >= self.csrmat.nnz() {
            return None;
        }
        // the source is the last row whose first edge is <= edge
        let indptr = self.csrmat.indptr();
        let offsets = indptr.raw_storage();
        let src = offsets.partition_point(|first| *first <= edge) - 1;
        Some((src, self.csrmat.indices()[edge]))
    }
} // end of impl TypedGraph

impl WalkGraphT for TypedGraph {
    fn get_nb_nodes(&self) -> usize {
        self.csrmat.rows()
    }

    fn get_nb_edges(&self) -> usize {
        self.csrmat.nnz()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn is_weighted(&self) -> bool {
        self.weighted
    }

    fn get_neighbours(&self, node: NodeId) -> Neighbours<'_> {
        let range = self.csrmat.indptr().outer_inds_sz(node);
        let first_edge = range.start;
        Neighbours::new(
            first_edge,
            &self.csrmat.indices()[range.clone()],
            &self.csrmat.data()[range],
        )
    }

    fn get_edge_id(&self, src: NodeId, dst: NodeId) -> Option<EdgeId> {
        if src >= self.get_nb_nodes() {
            return None;
        }
        let neighbours = self.get_neighbours(src);
        neighbours
            .get_destinations()
            .binary_search(&dst)
            .ok()
            .map(|i| neighbours.get_first_edge() + i)
    }

    fn get_edge_type_id(&self, edge: EdgeId) -> Option<EdgeTypeId> {
        self.edge_types.as_ref().and_then(|types| types[edge])
    }

    fn get_node_type_id(&self, node: NodeId) -> Option<NodeTypeId> {
        self.node_types.as_ref().and_then(|types| types[node])
    }

    fn has_edge_types(&self) -> bool {
        self.edge_types.is_some()
    }

    fn has_node_types(&self) -> bool {
        self.node_types.is_some()
    }
} // end of impl WalkGraphT for TypedGraph

//========================================================================================

// end of mod tests
