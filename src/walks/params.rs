//! Parameters of a batch of walks.
//!
//! A [WalksParameters] is built with [WalksParameters::new] and refined with setters.
//! Setters take an Option so that values coming from optional arguments can be passed through,
//! None leaves the current value unchanged. Setters validate their argument, so a
//! [WalksParameters] is always valid once constructed.

use crate::error::{Result, WalkError};

/// random state used when none is given
pub const DEFAULT_RANDOM_STATE: u64 = 42;

// a weight equal to 1. has no effect on transitions
fn not_one(weight: f64) -> bool {
    (weight - 1.).abs() > f64::EPSILON
}

/// The four biases of a second order walk. All equal to 1. gives a first order walk.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WalkWeights {
    /// multiplies the weight of the edge going back to the previous node
    pub(crate) return_weight: f64,
    /// multiplies the weight of edges going to nodes that are not neighbours of the previous node
    pub(crate) explore_weight: f64,
    /// multiplies the weight of edges whose type differs from the type of the previous edge
    pub(crate) change_edge_type_weight: f64,
    /// multiplies the weight of edges going to a node of type different from current node type
    pub(crate) change_node_type_weight: f64,
} // end of WalkWeights

impl Default for WalkWeights {
    fn default() -> Self {
        WalkWeights {
            return_weight: 1.,
            explore_weight: 1.,
            change_edge_type_weight: 1.,
            change_node_type_weight: 1.,
        }
    }
} // end of impl Default for WalkWeights

impl WalkWeights {
    /// checks a weight is a strictly positive real number
    pub fn validate_weight(weight_name: &str, weight: f64) -> Result<f64> {
        if weight <= 0. || !weight.is_finite() {
            Err(WalkError::InvalidParameter(format!(
                "given '{}' ({}) is not a strictly positive real number",
                weight_name, weight
            )))
        } else {
            Ok(weight)
        }
    }

    ///
    pub fn get_return_weight(&self) -> f64 {
        self.return_weight
    }

    ///
    pub fn get_explore_weight(&self) -> f64 {
        self.explore_weight
    }

    ///
    pub fn get_change_edge_type_weight(&self) -> f64 {
        self.change_edge_type_weight
    }

    ///
    pub fn get_change_node_type_weight(&self) -> f64 {
        self.change_node_type_weight
    }

    /// true if no weight has an effect
    pub fn is_first_order_walk(&self) -> bool {
        ![
            self.return_weight,
            self.explore_weight,
            self.change_edge_type_weight,
            self.change_node_type_weight,
        ]
        .iter()
        .any(|w| not_one(*w))
    }

    /// true if return or explore weight is active, i.e. transitions depend on the previous node
    pub fn is_node2vec_walk(&self) -> bool {
        not_one(self.return_weight) || not_one(self.explore_weight)
    }

    /// true if return, explore or edge type weight is active, i.e. transitions depend on the previous step
    pub fn is_second_order_walk(&self) -> bool {
        self.is_node2vec_walk() || not_one(self.change_edge_type_weight)
    }

    /// true if transitions are biased by node types
    pub fn has_node_type_bias(&self) -> bool {
        not_one(self.change_node_type_weight)
    }

    /// true if transitions are biased by edge types
    pub fn has_edge_type_bias(&self) -> bool {
        not_one(self.change_edge_type_weight)
    }
} // end of impl WalkWeights

/// Parameters of a single walk
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SingleWalkParameters {
    /// number of steps, a walk has at most length + 1 nodes
    pub(crate) length: usize,
    ///
    pub(crate) weights: WalkWeights,
    /// if a node has more out-edges, each step samples this number of candidate edges
    pub(crate) max_neighbours: Option<usize>,
    /// divide candidate weights by 1 + out-degree of destination
    pub(crate) normalize_by_degree: bool,
} // end of SingleWalkParameters

impl SingleWalkParameters {
    pub fn new(length: usize) -> Result<Self> {
        if length == 0 {
            return Err(WalkError::InvalidParameter(String::from(
                "walk length must be a strictly positive integer",
            )));
        }
        Ok(SingleWalkParameters {
            length,
            weights: WalkWeights::default(),
            max_neighbours: None,
            normalize_by_degree: false,
        })
    }

    /// number of steps
    pub fn get_length(&self) -> usize {
        self.length
    }

    ///
    pub fn get_weights(&self) -> &WalkWeights {
        &self.weights
    }

    ///
    pub fn get_max_neighbours(&self) -> Option<usize> {
        self.max_neighbours
    }

    ///
    pub fn get_normalize_by_degree(&self) -> bool {
        self.normalize_by_degree
    }

    /// true if transition probabilities are proportional to edge weights
    pub fn is_first_order_walk(&self) -> bool {
        self.weights.is_first_order_walk() && !self.normalize_by_degree
    }
} // end of impl SingleWalkParameters

/// Parameters of a batch of walks: a single walk description, the number of walks by start node,
/// the random state, and the progress display flag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WalksParameters {
    pub(crate) single_walk_parameters: SingleWalkParameters,
    /// number of walks by start node
    pub(crate) iterations: usize,
    ///
    pub(crate) random_state: u64,
    /// display a progress bar
    pub(crate) verbose: bool,
} // end of WalksParameters

impl WalksParameters {
    /// A first order walk of length steps, 1 iteration, default random state.
    pub fn new(length: usize) -> Result<Self> {
        Ok(WalksParameters {
            single_walk_parameters: SingleWalkParameters::new(length)?,
            iterations: 1,
            random_state: DEFAULT_RANDOM_STATE,
            verbose: false,
        })
    }

    /// set the number of walks by start node, must be >= 1
    pub fn set_iterations(mut self, iterations: Option<usize>) -> Result<Self> {
        if let Some(it) = iterations {
            if it == 0 {
                return Err(WalkError::InvalidParameter(String::from(
                    "iterations must be a strictly positive integer",
                )));
            }
            self.iterations = it;
        }
        Ok(self)
    }

    /// set the random state for reproducible walks
    pub fn set_random_state(mut self, random_state: Option<u64>) -> Self {
        if let Some(s) = random_state {
            self.random_state = s;
        }
        self
    }

    /// show a progress bar during walk generation
    pub fn set_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.verbose = v;
        }
        self
    }

    /// set the return weight, values > 1 favour going back to the previous node
    pub fn set_return_weight(mut self, return_weight: Option<f64>) -> Result<Self> {
        if let Some(w) = return_weight {
            self.single_walk_parameters.weights.return_weight =
                WalkWeights::validate_weight("return_weight", w)?;
        }
        Ok(self)
    }

    /// set the explore weight, values > 1 favour nodes that are not neighbours of the previous node
    pub fn set_explore_weight(mut self, explore_weight: Option<f64>) -> Result<Self> {
        if let Some(w) = explore_weight {
            self.single_walk_parameters.weights.explore_weight =
                WalkWeights::validate_weight("explore_weight", w)?;
        }
        Ok(self)
    }

    /// set the weight of a change of edge type between consecutive steps
    pub fn set_change_edge_type_weight(mut self, change_edge_type_weight: Option<f64>) -> Result<Self> {
        if let Some(w) = change_edge_type_weight {
            self.single_walk_parameters.weights.change_edge_type_weight =
                WalkWeights::validate_weight("change_edge_type_weight", w)?;
        }
        Ok(self)
    }

    /// set the weight of a change of node type along a step
    pub fn set_change_node_type_weight(mut self, change_node_type_weight: Option<f64>) -> Result<Self> {
        if let Some(w) = change_node_type_weight {
            self.single_walk_parameters.weights.change_node_type_weight =
                WalkWeights::validate_weight("change_node_type_weight", w)?;
        }
        Ok(self)
    }

    /// limit the number of out-edges considered at each step, must be >= 1
    pub fn set_max_neighbours(mut self, max_neighbours: Option<usize>) -> Result<Self> {
        if let Some(mn) = max_neighbours {
            if mn == 0 {
                return Err(WalkError::InvalidParameter(String::from(
                    "max_neighbours must be a strictly positive integer",
                )));
            }
            self.single_walk_parameters.max_neighbours = Some(mn);
        }
        Ok(self)
    }

    /// weight destinations by the inverse of their out-degree (plus one)
    pub fn set_normalize_by_degree(mut self, normalize_by_degree: Option<bool>) -> Self {
        if let Some(n) = normalize_by_degree {
            self.single_walk_parameters.normalize_by_degree = n;
        }
        self
    }

    ///
    pub fn get_single_walk_parameters(&self) -> &SingleWalkParameters {
        &self.single_walk_parameters
    }

    /// number of steps of a walk
    pub fn get_length(&self) -> usize {
        self.single_walk_parameters.length
    }

    ///
    pub fn get_iterations(&self) -> usize {
        self.iterations
    }

    ///
    pub fn get_random_state(&self) -> u64 {
        self.random_state
    }

    ///
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    ///
    pub fn get_weights(&self) -> &WalkWeights {
        &self.single_walk_parameters.weights
    }

    ///
    pub fn is_first_order_walk(&self) -> bool {
        self.single_walk_parameters.is_first_order_walk()
    }
} // end of impl WalksParameters

impl Default for WalksParameters {
    /// first order walks of 32 steps
    fn default() -> Self {
        WalksParameters {
            single_walk_parameters: SingleWalkParameters {
                length: 32,
                weights: WalkWeights::default(),
                max_neighbours: None,
                normalize_by_degree: false,
            },
            iterations: 1,
            random_state: DEFAULT_RANDOM_STATE,
            verbose: false,
        }
    }
} // end of impl Default for WalksParameters

// end of mod tests
