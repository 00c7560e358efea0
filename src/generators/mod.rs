//! Small graph generators: circle, chain, complete graph, and a typed small world graph
//! (ring lattice with random rewiring) with node and edge types drawn from weighted categories.

use std::collections::BTreeSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{Result, WalkError};
use crate::graph::{NodeId, TypedGraph, TypedGraphBuilder};

/// circle 0 -> 1 -> ... -> n-1 -> 0
pub fn circle_graph(nb_nodes: usize, directed: bool) -> Result<TypedGraph> {
    if nb_nodes < 2 {
        return Err(WalkError::InvalidParameter(String::from(
            "a circle needs at least 2 nodes",
        )));
    }
    let mut builder = TypedGraphBuilder::new(nb_nodes, directed);
    for node in 0..nb_nodes {
        // with 2 nodes undirected, 1 - 0 is the same edge as 0 - 1
        if !directed && nb_nodes == 2 && node == 1 {
            break;
        }
        builder.add_edge(node, (node + 1) % nb_nodes, None, None)?;
    }
    builder.build()
} // end of circle_graph

/// chain 0 -> 1 -> ... -> n-1
pub fn chain_graph(nb_nodes: usize, directed: bool) -> Result<TypedGraph> {
    if nb_nodes == 0 {
        return Err(WalkError::InvalidParameter(String::from(
            "a chain needs at least 1 node",
        )));
    }
    let mut builder = TypedGraphBuilder::new(nb_nodes, directed);
    for node in 1..nb_nodes {
        builder.add_edge(node - 1, node, None, None)?;
    }
    builder.build()
} // end of chain_graph

/// undirected complete graph without selfloops
pub fn complete_graph(nb_nodes: usize) -> Result<TypedGraph> {
    if nb_nodes < 2 {
        return Err(WalkError::InvalidParameter(String::from(
            "a complete graph needs at least 2 nodes",
        )));
    }
    let mut builder = TypedGraphBuilder::new(nb_nodes, false);
    for i in 0..nb_nodes {
        for j in i + 1..nb_nodes {
            builder.add_edge(i, j, None, None)?;
        }
    }
    builder.build()
} // end of complete_graph

/// Parameters of [small_world_graph].
///
/// Node type k is named `node_type_k` and drawn with probability proportional to `node_type_weights[k]`,
/// the same goes for edge types. An empty weight vector gives an untyped graph.
#[derive(Clone, Debug)]
pub struct SmallWorldParams {
    /// number of nodes
    pub nb_nodes: usize,
    /// each node is linked to its nb_successors successors on the ring
    pub nb_successors: usize,
    /// probability to rewire a link to a random node
    pub rewire_probability: f64,
    ///
    pub node_type_weights: Vec<f64>,
    ///
    pub edge_type_weights: Vec<f64>,
    /// seed of the generator
    pub seed: u64,
}

impl SmallWorldParams {
    pub fn new(nb_nodes: usize, nb_successors: usize, rewire_probability: f64, seed: u64) -> Self {
        SmallWorldParams {
            nb_nodes,
            nb_successors,
            rewire_probability,
            node_type_weights: Vec::new(),
            edge_type_weights: Vec::new(),
            seed,
        }
    }

    ///
    pub fn with_node_type_weights(mut self, weights: &[f64]) -> Self {
        self.node_type_weights = weights.to_vec();
        self
    }

    ///
    pub fn with_edge_type_weights(mut self, weights: &[f64]) -> Self {
        self.edge_type_weights = weights.to_vec();
        self
    }

    fn check(&self) -> Result<()> {
        if self.nb_nodes < 3 {
            return Err(WalkError::InvalidParameter(String::from(
                "small world graph needs at least 3 nodes",
            )));
        }
        if self.nb_successors == 0 || 2 * self.nb_successors >= self.nb_nodes {
            return Err(WalkError::InvalidParameter(format!(
                "nb_successors must be in [1, {}[",
                (self.nb_nodes + 1) / 2
            )));
        }
        if !(0. ..=1.).contains(&self.rewire_probability) {
            return Err(WalkError::InvalidParameter(format!(
                "rewire probability {} not in [0, 1]",
                self.rewire_probability
            )));
        }
        Ok(())
    }
} // end of impl SmallWorldParams

fn get_category_sampler(weights: &[f64], what: &str) -> Result<Option<WeightedIndex<f64>>> {
    if weights.is_empty() {
        return Ok(None);
    }
    WeightedIndex::new(weights)
        .map(Some)
        .map_err(|err| WalkError::InvalidParameter(format!("{} weights : {}", what, err)))
}

/// Undirected unweighted small world graph.
pub fn small_world_graph(params: &SmallWorldParams) -> Result<TypedGraph> {
    params.check()?;
    let nb_nodes = params.nb_nodes;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(params.seed);
    // ordered set of (min, max) pairs, duplicates created by rewiring are dropped
    let mut edges = BTreeSet::<(NodeId, NodeId)>::new();
    for node in 0..nb_nodes {
        for shift in 1..=params.nb_successors {
            let mut dst = (node + shift) % nb_nodes;
            if rng.gen::<f64>() < params.rewire_probability {
                dst = rng.gen_range(0..nb_nodes);
                while dst == node {
                    dst = rng.gen_range(0..nb_nodes);
                }
            }
            edges.insert((node.min(dst), node.max(dst)));
        }
    }
    //
    let edge_sampler = get_category_sampler(&params.edge_type_weights, "edge type")?;
    let node_sampler = get_category_sampler(&params.node_type_weights, "node type")?;
    let mut builder = TypedGraphBuilder::new(nb_nodes, false);
    for (src, dst) in edges {
        match &edge_sampler {
            Some(sampler) => {
                let edge_type = format!("edge_type_{}", sampler.sample(&mut rng));
                builder.add_edge(src, dst, None, Some(&edge_type))?;
            }
            None => builder.add_edge(src, dst, None, None)?,
        }
    }
    if let Some(sampler) = &node_sampler {
        for node in 0..nb_nodes {
            let node_type = format!("node_type_{}", sampler.sample(&mut rng));
            builder.set_node_type(node, Some(&node_type))?;
        }
    }
    log::debug!(
        "small_world_graph nb nodes : {}, nb successors : {}, rewire : {:.3e}",
        nb_nodes,
        params.nb_successors,
        params.rewire_probability
    );
    builder.build()
} // end of small_world_graph

// end of mod tests
