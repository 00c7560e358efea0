//! Incremental construction of a [TypedGraph].
//!
//! Edges are collected as triplets, then sorted by (source, destination) to fill a compressed row matrix
//! whose data rank gives the edge id. For an undirected graph each edge is stored in both directions
//! with the same weight and type (a selfloop once).

use indexmap::IndexSet;
use sprs::CsMatI;

use super::*;
use crate::error::{Result, WalkError};

// one directed entry before sorting
#[derive(Copy, Clone, Debug)]
struct EdgeEntry {
    src: NodeId,
    dst: NodeId,
    weight: WeightT,
    edge_type: Option<EdgeTypeId>,
}

/// Collects edges and node types, then builds a [TypedGraph].
///
/// Weights must be finite and strictly positive. As soon as one edge is given a weight the graph is weighted,
/// edges given without weight get weight 1. Duplicate edges are rejected at build time.
pub struct TypedGraphBuilder {
    nb_nodes: usize,
    directed: bool,
    entries: Vec<EdgeEntry>,
    weighted: bool,
    edge_types: bool,
    node_types: Vec<Option<NodeTypeId>>,
    has_node_types: bool,
    edge_type_names: IndexSet<String>,
    node_type_names: IndexSet<String>,
} // end of struct TypedGraphBuilder

impl TypedGraphBuilder {
    pub fn new(nb_nodes: usize, directed: bool) -> Self {
        TypedGraphBuilder {
            nb_nodes,
            directed,
            entries: Vec::new(),
            weighted: false,
            edge_types: false,
            node_types: vec![None; nb_nodes],
            has_node_types: false,
            edge_type_names: IndexSet::new(),
            node_type_names: IndexSet::new(),
        }
    } // end of new

    ///
    pub fn get_nb_nodes(&self) -> usize {
        self.nb_nodes
    }

    ///
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node >= self.nb_nodes {
            return Err(WalkError::InvalidGraph(format!(
                "node {} out of range, graph has {} nodes",
                node, self.nb_nodes
            )));
        }
        Ok(())
    }

    /// add edge src -> dst (and dst -> src if graph is undirected)
    pub fn add_edge(
        &mut self,
        src: NodeId,
        dst: NodeId,
        weight: Option<WeightT>,
        edge_type: Option<&str>,
    ) -> Result<()> {
        self.check_node(src)?;
        self.check_node(dst)?;
        let weight = match weight {
            Some(w) => {
                if !w.is_finite() || w <= 0. {
                    return Err(WalkError::InvalidGraph(format!(
                        "edge {} -> {} has weight {}, weights must be finite and strictly positive",
                        src, dst, w
                    )));
                }
                self.weighted = true;
                w
            }
            None => 1.,
        };
        let edge_type = match edge_type {
            Some(name) => {
                self.edge_types = true;
                let rank = match self.edge_type_names.get_index_of(name) {
                    Some(rank) => rank,
                    None => {
                        if self.edge_type_names.len() > EdgeTypeId::MAX as usize {
                            return Err(WalkError::InvalidGraph(String::from("too many edge types")));
                        }
                        self.edge_type_names.insert_full(name.to_string()).0
                    }
                };
                Some(rank as EdgeTypeId)
            }
            None => None,
        };
        self.entries.push(EdgeEntry {
            src,
            dst,
            weight,
            edge_type,
        });
        if !self.directed && src != dst {
            self.entries.push(EdgeEntry {
                src: dst,
                dst: src,
                weight,
                edge_type,
            });
        }
        Ok(())
    } // end of add_edge

    /// set (or reset with None) the type of a node
    pub fn set_node_type(&mut self, node: NodeId, node_type: Option<&str>) -> Result<()> {
        self.check_node(node)?;
        self.node_types[node] = match node_type {
            Some(name) => {
                let rank = match self.node_type_names.get_index_of(name) {
                    Some(rank) => rank,
                    None => {
                        if self.node_type_names.len() > NodeTypeId::MAX as usize {
                            return Err(WalkError::InvalidGraph(String::from("too many node types")));
                        }
                        self.node_type_names.insert_full(name.to_string()).0
                    }
                };
                self.has_node_types = true;
                Some(rank as NodeTypeId)
            }
            None => None,
        };
        Ok(())
    } // end of set_node_type

    /// sorts edges and fills the compressed row matrix.
    pub fn build(mut self) -> Result<TypedGraph> {
        log::debug!(
            "TypedGraphBuilder::build nb nodes : {}, nb entries : {}, directed : {}",
            self.nb_nodes,
            self.entries.len(),
            self.directed
        );
        self.entries
            .sort_unstable_by(|a, b| (a.src, a.dst).cmp(&(b.src, b.dst)));
        if let Some(dup) = self
            .entries
            .windows(2)
            .find(|pair| pair[0].src == pair[1].src && pair[0].dst == pair[1].dst)
        {
            return Err(WalkError::InvalidGraph(format!(
                "duplicated edge {} -> {}",
                dup[0].src, dup[0].dst
            )));
        }
        //
        let nb_edges = self.entries.len();
        let mut indptr = vec![0usize; self.nb_nodes + 1];
        for entry in &self.entries {
            indptr[entry.src + 1] += 1;
        }
        for i in 0..self.nb_nodes {
            indptr[i + 1] += indptr[i];
        }
        let mut indices = Vec::<usize>::with_capacity(nb_edges);
        let mut data = Vec::<WeightT>::with_capacity(nb_edges);
        let mut edge_types = Vec::<Option<EdgeTypeId>>::with_capacity(nb_edges);
        for entry in &self.entries {
            indices.push(entry.dst);
            data.push(entry.weight);
            edge_types.push(entry.edge_type);
        }
        let csrmat = CsMatI::<WeightT, usize>::new((self.nb_nodes, self.nb_nodes), indptr, indices, data);
        //
        let edge_types = if self.edge_types { Some(edge_types) } else { None };
        let node_types = if self.has_node_types { Some(self.node_types) } else { None };
        let graph = TypedGraph::new(
            csrmat,
            self.directed,
            self.weighted,
            edge_types,
            node_types,
            self.edge_type_names,
            self.node_type_names,
        );
        log::info!(
            "built graph nb nodes : {}, nb edges : {}, nb edge types : {}, nb node types : {}",
            graph.get_nb_nodes(),
            graph.get_nb_edges(),
            graph.get_nb_edge_types(),
            graph.get_nb_node_types()
        );
        Ok(graph)
    } // end of build
} // end of impl TypedGraphBuilder

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_undirected_mirrors_edges() {
        log_init_test();
        let mut builder = TypedGraphBuilder::new(3, false);
        builder.add_edge(2, 0, Some(3.), Some("r")).unwrap();
        builder.add_edge(1, 1, None, Some("s")).unwrap();
        let graph = builder.build().unwrap();
        // 2 -> 0, 0 -> 2 and the selfloop stored once
        assert_eq!(graph.get_nb_edges(), 3);
        assert_eq!(graph.get_neighbours(0).get_destinations(), &[2]);
        assert_eq!(graph.get_neighbours(0).get_weights(), &[3.]);
        assert_eq!(graph.get_neighbours(1).get_destinations(), &[1]);
        // unweighted edge defaults to 1 in a weighted graph
        assert_eq!(graph.get_neighbours(1).get_weights(), &[1.]);
        assert!(graph.is_weighted());
        assert_eq!(graph.get_nb_edge_types(), 2);
    } // end of test_undirected_mirrors_edges

    #[test]
    fn test_rejects_bad_input() {
        log_init_test();
        let mut builder = TypedGraphBuilder::new(2, true);
        assert!(matches!(
            builder.add_edge(0, 2, None, None),
            Err(WalkError::InvalidGraph(_))
        ));
        assert!(builder.add_edge(0, 1, Some(0.), None).is_err());
        assert!(builder.add_edge(0, 1, Some(-1.), None).is_err());
        assert!(builder.add_edge(0, 1, Some(f64::NAN), None).is_err());
        assert!(builder.set_node_type(5, Some("t")).is_err());
        builder.add_edge(0, 1, None, None).unwrap();
        builder.add_edge(0, 1, None, None).unwrap();
        assert!(matches!(builder.build(), Err(WalkError::InvalidGraph(_))));
        // in an undirected graph a -> b and b -> a are the same edge
        let mut builder = TypedGraphBuilder::new(2, false);
        builder.add_edge(0, 1, None, None).unwrap();
        builder.add_edge(1, 0, None, None).unwrap();
        assert!(builder.build().is_err());
    } // end of test_rejects_bad_input

    #[test]
    fn test_empty_graph_builds() {
        log_init_test();
        let graph = TypedGraphBuilder::new(0, false).build().unwrap();
        assert_eq!(graph.get_nb_nodes(), 0);
        assert_eq!(graph.get_nb_edges(), 0);
        let graph = TypedGraphBuilder::new(5, true).build().unwrap();
        assert_eq!(graph.get_nb_nodes(), 5);
        assert_eq!(graph.get_trap_nodes().len(), 5);
    } // end of test_empty_graph_builds

    #[test]
    fn test_type_overflow_leaves_names_unchanged() {
        log_init_test();
        let mut builder = TypedGraphBuilder::new(2, false);
        for i in 0..=NodeTypeId::MAX as usize {
            builder.set_node_type(0, Some(format!("t{}", i).as_str())).unwrap();
        }
        assert_eq!(builder.node_type_names.len(), NodeTypeId::MAX as usize + 1);
        assert!(matches!(
            builder.set_node_type(1, Some("one too many")),
            Err(WalkError::InvalidGraph(_))
        ));
        assert_eq!(builder.node_type_names.len(), NodeTypeId::MAX as usize + 1);
        // known names are still accepted
        builder.set_node_type(1, Some("t7")).unwrap();
        assert_eq!(builder.node_types[1], Some(7));
        //
        for i in 0..=EdgeTypeId::MAX as usize {
            builder.edge_type_names.insert(format!("e{}", i));
        }
        assert!(builder.add_edge(0, 1, None, Some("new edge type")).is_err());
        assert_eq!(builder.edge_type_names.len(), EdgeTypeId::MAX as usize + 1);
        assert!(builder.entries.is_empty());
        builder.add_edge(0, 1, None, Some("e3")).unwrap();
        assert_eq!(builder.entries[0].edge_type, Some(3));
    } // end of test_type_overflow_leaves_names_unchanged
} // end of mod tests
