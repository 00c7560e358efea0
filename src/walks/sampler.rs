//! Generation of batches of walks.
//!
//! Each (start node, iteration) unit gets its own random generator, seeded from the random state of
//! the parameters, the start node and the iteration rank. Units are run in parallel with rayon and
//! write into their own slot of the result, so a batch is reproducible whatever the number of threads.
//!
//! The result is ordered by iteration then start node: with s start nodes, walk `it * s + k` is
//! iteration it from the k-th start node.

use std::time::SystemTime;

use cpu_time::ProcessTime;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use super::params::WalksParameters;
use super::transition::{PreviousStep, TransitionBuffer};
use crate::error::{Result, WalkError};
use crate::graph::{NodeId, WalkGraphT};

// salt separating seeds of random_walks units from complete walks units
const RANDOM_SOURCES_SALT: u64 = 0x5851_f42d_4c95_7f2d;

/// mixing function used to derive seeds
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// seed of the walk of rank iteration for a start unit with base seed unit_seed
pub fn get_iteration_seed(unit_seed: u64, iteration: usize) -> u64 {
    splitmix64(unit_seed ^ splitmix64((iteration as u64) << 32))
}

/// base seed of a start node
pub fn get_node_seed(random_state: u64, node: NodeId) -> u64 {
    splitmix64(random_state ^ splitmix64(node as u64))
}

fn get_progress_bar(verbose: bool, nb_walks: usize) -> ProgressBar {
    if !verbose {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(nb_walks as u64);
    match ProgressStyle::with_template(
        "Compute random walks {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] ({pos}/{len}, ETA {eta})",
    ) {
        Ok(style) => pb.set_style(style),
        Err(err) => log::warn!("could not set progress bar style : {}", err),
    }
    pb
} // end of get_progress_bar

/// Generates walks on a graph with given parameters.
pub struct WalkSampler<'a, G: WalkGraphT + Sync> {
    graph: &'a G,
    parameters: WalksParameters,
} // end of struct WalkSampler

impl<'a, G> WalkSampler<'a, G>
where
    G: WalkGraphT + Sync,
{
    pub fn new(graph: &'a G, parameters: WalksParameters) -> Self {
        WalkSampler { graph, parameters }
    }

    ///
    pub fn get_parameters(&self) -> &WalksParameters {
        &self.parameters
    }

    ///
    pub fn get_graph(&self) -> &G {
        self.graph
    }

    // a graph without nodes or edges cannot be walked
    fn validate(&self) -> Result<()> {
        if self.graph.get_nb_nodes() == 0 {
            return Err(WalkError::EmptyGraph(String::from("graph has no node")));
        }
        if self.graph.get_nb_edges() == 0 {
            return Err(WalkError::EmptyGraph(String::from("graph has no edge")));
        }
        Ok(())
    }

    fn check_start(&self, node: NodeId) -> Result<()> {
        if node >= self.graph.get_nb_nodes() {
            return Err(WalkError::InvalidNode(node));
        }
        Ok(())
    }

    /// iterations walks from every node of the graph
    pub fn complete_walks(&self) -> Result<Vec<Vec<NodeId>>> {
        self.validate()?;
        let random_state = self.parameters.random_state;
        let units: Vec<(NodeId, u64)> = (0..self.graph.get_nb_nodes())
            .map(|node| (node, get_node_seed(random_state, node)))
            .collect();
        Ok(self.walk_units(&units))
    } // end of complete_walks

    /// iterations walks from each node of nodes.
    ///
    /// The walk of a node for an iteration is the same as the one in [complete_walks](Self::complete_walks).
    pub fn walks_from_nodes(&self, nodes: &[NodeId]) -> Result<Vec<Vec<NodeId>>> {
        self.validate()?;
        for node in nodes {
            self.check_start(*node)?;
        }
        let random_state = self.parameters.random_state;
        let units: Vec<(NodeId, u64)> = nodes
            .iter()
            .map(|node| (*node, get_node_seed(random_state, *node)))
            .collect();
        Ok(self.walk_units(&units))
    } // end of walks_from_nodes

    /// iterations walks from each of quantity start nodes drawn uniformly among nodes having out-edges.
    pub fn random_walks(&self, quantity: usize) -> Result<Vec<Vec<NodeId>>> {
        self.validate()?;
        if quantity == 0 {
            return Err(WalkError::InvalidParameter(String::from(
                "quantity of random walks must be a strictly positive integer",
            )));
        }
        let sources: Vec<NodeId> = (0..self.graph.get_nb_nodes())
            .filter(|node| self.graph.get_out_degree(*node) > 0)
            .collect();
        log::debug!(
            "random_walks quantity : {}, nb possible sources : {}",
            quantity,
            sources.len()
        );
        let salted = self.parameters.random_state ^ RANDOM_SOURCES_SALT;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(splitmix64(salted));
        let units: Vec<(NodeId, u64)> = (0..quantity)
            .map(|k| {
                let node = sources[rng.gen_range(0..sources.len())];
                (node, get_node_seed(salted, k))
            })
            .collect();
        Ok(self.walk_units(&units))
    } // end of random_walks

    /// one walk from start, with its own generator seeded by seed
    pub fn single_walk(&self, start: NodeId, seed: u64) -> Result<Vec<NodeId>> {
        self.check_start(start)?;
        let mut buffer = TransitionBuffer::new();
        Ok(self.single_walk_with_buffer(start, seed, &mut buffer))
    }

    fn single_walk_with_buffer(&self, start: NodeId, seed: u64, buffer: &mut TransitionBuffer) -> Vec<NodeId> {
        let single = &self.parameters.single_walk_parameters;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut walk = Vec::<NodeId>::with_capacity(single.length + 1);
        walk.push(start);
        let mut curr = start;
        let mut previous: Option<PreviousStep> = None;
        for _ in 0..single.length {
            match buffer.sample_step(self.graph, curr, previous, single, &mut rng) {
                Some((next, edge)) => {
                    walk.push(next);
                    previous = Some(PreviousStep { node: curr, edge });
                    curr = next;
                }
                // no out-edge, the walk stops here
                None => break,
            }
        }
        walk
    } // end of single_walk_with_buffer

    // units are (start node, base seed)
    fn walk_units(&self, units: &[(NodeId, u64)]) -> Vec<Vec<NodeId>> {
        let nb_units = units.len();
        let nb_walks = nb_units * self.parameters.iterations;
        let weights = self.parameters.get_weights();
        log::info!(
            "starting walks, nb start nodes : {}, iterations : {}, length : {}",
            nb_units,
            self.parameters.iterations,
            self.parameters.get_length()
        );
        log::debug!(
            "walk weights {:?}, first order : {}, second order : {}, max_neighbours : {:?}",
            weights,
            self.parameters.is_first_order_walk(),
            weights.is_second_order_walk(),
            self.parameters.single_walk_parameters.max_neighbours
        );
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        let pb = get_progress_bar(self.parameters.verbose, nb_walks);
        //
        let walks: Vec<Vec<NodeId>> = (0..nb_walks)
            .into_par_iter()
            .map_init(TransitionBuffer::new, |buffer, rank| {
                let iteration = rank / nb_units;
                let (start, unit_seed) = units[rank % nb_units];
                let walk = self.single_walk_with_buffer(start, get_iteration_seed(unit_seed, iteration), buffer);
                pb.inc(1);
                walk
            })
            .collect();
        pb.finish_and_clear();
        //
        let sys_elapsed = sys_start.elapsed().map(|d| d.as_secs_f64()).unwrap_or(0.);
        log::info!(
            "walks done, nb walks : {}, sys time(s) {:.2e} cpu time(s) {:.2e}",
            walks.len(),
            sys_elapsed,
            cpu_start.elapsed().as_secs_f64()
        );
        walks
    } // end of walk_units
} // end of impl WalkSampler

/// Walks on any graph implementing [WalkGraphT]: `graph.walk(&parameters)`.
pub trait Walker: WalkGraphT + Sync + Sized {
    /// iterations walks from every node, see [WalkSampler::complete_walks]
    fn walk(&self, parameters: &WalksParameters) -> Result<Vec<Vec<NodeId>>> {
        WalkSampler::new(self, *parameters).complete_walks()
    }
}

impl<G: WalkGraphT + Sync> Walker for G {}

//=====================================================================================

// end of mod tests
