//! Transition weights of a second order walk and sampling of the next step.
//!
//! Being at node `curr`, having arrived from `prev` through edge `e_prev`, the weight of out-edge
//! `curr -> next` (of type t and base weight w) is w multiplied by:
//!
//! - return_weight if next == prev,
//! - explore_weight if next != prev and there is no edge prev -> next,
//! - change_edge_type_weight if t differs from the type of `e_prev`,
//! - change_node_type_weight if the type of next differs from the type of curr.
//!
//! On the first step there is no previous node and only the node type factor applies.
//! A missing type (None) is a type of its own when comparing types.
//! For a directed graph only out-edges of prev define its neighbourhood.

use rand::Rng;

use super::params::SingleWalkParameters;
use crate::graph::{EdgeId, EdgeTypeId, NodeId, NodeTypeId, WalkGraphT};

/// The step that brought a walk to its current node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PreviousStep {
    /// node we come from
    pub node: NodeId,
    /// edge used to reach the current node
    pub edge: EdgeId,
}

// what is needed about the current position to weight candidates
struct StepContext {
    curr_type: Option<NodeTypeId>,
    previous: Option<PreviousStep>,
    previous_edge_type: Option<EdgeTypeId>,
}

impl StepContext {
    fn new<G: WalkGraphT>(graph: &G, curr: NodeId, previous: Option<PreviousStep>) -> Self {
        StepContext {
            curr_type: graph.get_node_type_id(curr),
            previous,
            previous_edge_type: previous.and_then(|p| graph.get_edge_type_id(p.edge)),
        }
    }
} // end of impl StepContext

// logarithm of the adjusted weight of edge curr -> dst with base weight base.
// Factors are summed as logarithms, their product can overflow even if each weight is finite.
fn log_adjusted_weight<G: WalkGraphT>(
    graph: &G,
    context: &StepContext,
    params: &SingleWalkParameters,
    dst: NodeId,
    edge: EdgeId,
    base: f64,
) -> f64 {
    let weights = &params.weights;
    let mut log_weight = base.ln();
    if let Some(previous) = context.previous {
        if weights.is_node2vec_walk() {
            if dst == previous.node {
                log_weight += weights.return_weight.ln();
            } else if !graph.has_edge(previous.node, dst) {
                log_weight += weights.explore_weight.ln();
            }
        }
        if weights.has_edge_type_bias()
            && graph.has_edge_types()
            && graph.get_edge_type_id(edge) != context.previous_edge_type
        {
            log_weight += weights.change_edge_type_weight.ln();
        }
    }
    if weights.has_node_type_bias()
        && graph.has_node_types()
        && graph.get_node_type_id(dst) != context.curr_type
    {
        log_weight += weights.change_node_type_weight.ln();
    }
    if params.normalize_by_degree {
        log_weight -= ((1 + graph.get_out_degree(dst)) as f64).ln();
    }
    log_weight
} // end of log_adjusted_weight

fn get_log_transition_weights<G: WalkGraphT>(
    graph: &G,
    curr: NodeId,
    previous: Option<PreviousStep>,
    params: &SingleWalkParameters,
) -> Vec<(NodeId, EdgeId, f64)> {
    let context = StepContext::new(graph, curr, previous);
    graph
        .get_neighbours(curr)
        .iter()
        .map(|(dst, edge, base)| (dst, edge, log_adjusted_weight(graph, &context, params, dst, edge, base)))
        .collect()
}

/// Returns (destination, edge, adjusted weight) for all out-edges of curr.
///
/// Weights are not normalized, with extreme walk weights they can overflow to infinity.
/// `max_neighbours` is not taken into account.
pub fn get_transition_weights<G: WalkGraphT>(
    graph: &G,
    curr: NodeId,
    previous: Option<PreviousStep>,
    params: &SingleWalkParameters,
) -> Vec<(NodeId, EdgeId, f64)> {
    let mut transitions = get_log_transition_weights(graph, curr, previous, params);
    for t in transitions.iter_mut() {
        t.2 = t.2.exp();
    }
    transitions
} // end of get_transition_weights

/// Same as [get_transition_weights] but weights are normalized to a probability distribution.
/// Normalization is done on weights rescaled by the largest one, so it does not overflow.
pub fn get_transition_probabilities<G: WalkGraphT>(
    graph: &G,
    curr: NodeId,
    previous: Option<PreviousStep>,
    params: &SingleWalkParameters,
) -> Vec<(NodeId, EdgeId, f64)> {
    let mut transitions = get_log_transition_weights(graph, curr, previous, params);
    let max_log = transitions
        .iter()
        .map(|t| t.2)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.;
    for t in transitions.iter_mut() {
        t.2 = (t.2 - max_log).exp();
        total += t.2;
    }
    if total > 0. {
        for t in transitions.iter_mut() {
            t.2 /= total;
        }
    }
    transitions
} // end of get_transition_probabilities

/// Buffers reused along a walk to avoid an allocation by step.
pub(crate) struct TransitionBuffer {
    /// rank of candidates among out-edges of current node
    candidates: Vec<usize>,
    /// cumulated weights of candidates
    cumulative: Vec<f64>,
}

impl TransitionBuffer {
    pub(crate) fn new() -> Self {
        TransitionBuffer {
            candidates: Vec::new(),
            cumulative: Vec::new(),
        }
    }

    // all out-edges, or a uniform sample of max_neighbours of them
    fn select_candidates<R: Rng>(&mut self, degree: usize, max_neighbours: Option<usize>, rng: &mut R) {
        self.candidates.clear();
        match max_neighbours {
            Some(max) if degree > max => {
                self.candidates
                    .extend(rand::seq::index::sample(rng, degree, max).into_iter());
            }
            _ => self.candidates.extend(0..degree),
        }
    } // end of select_candidates

    /// Samples the next step from curr. Returns (next node, edge used) or None if curr has no out-edge.
    pub(crate) fn sample_step<G: WalkGraphT, R: Rng>(
        &mut self,
        graph: &G,
        curr: NodeId,
        previous: Option<PreviousStep>,
        params: &SingleWalkParameters,
        rng: &mut R,
    ) -> Option<(NodeId, EdgeId)> {
        let neighbours = graph.get_neighbours(curr);
        if neighbours.is_empty() {
            return None;
        }
        let first_order = params.is_first_order_walk();
        // uniform first order walk, no weight to compute
        if first_order && !graph.is_weighted() {
            let rank = rng.gen_range(0..neighbours.len());
            let (dst, edge, _) = neighbours.get(rank);
            return Some((dst, edge));
        }
        // a first order walk does not depend on the previous step
        let previous = if first_order { None } else { previous };
        let context = StepContext::new(graph, curr, previous);
        self.select_candidates(neighbours.len(), params.max_neighbours, rng);
        // log weights first, then cumulated weights rescaled by the largest one
        self.cumulative.clear();
        let mut max_log = f64::NEG_INFINITY;
        for rank in &self.candidates {
            let (dst, edge, base) = neighbours.get(*rank);
            let log_weight = log_adjusted_weight(graph, &context, params, dst, edge, base);
            max_log = max_log.max(log_weight);
            self.cumulative.push(log_weight);
        }
        let mut total = 0.;
        for c in self.cumulative.iter_mut() {
            total += (*c - max_log).exp();
            *c = total;
        }
        let xsi = rng.gen::<f64>() * total;
        let chosen = self
            .cumulative
            .partition_point(|c| *c <= xsi)
            .min(self.candidates.len() - 1);
        let (dst, edge, _) = neighbours.get(self.candidates[chosen]);
        log::trace!("sample_step curr : {}, next : {}, edge : {}", curr, dst, edge);
        Some((dst, edge))
    } // end of sample_step
} // end of impl TransitionBuffer

//=====================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::{TypedGraph, TypedGraphBuilder};
    use crate::walks::params::WalksParameters;

    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // triangle 0 1 2 with a pendant 3 attached to 1, and 4 attached to 3
    //
    //   0 ---- 1 ---- 3 ---- 4
    //    \    /
    //     \  /
    //      2
    // edge types : 0-1 "a", 1-2 "a", 0-2 "b", 1-3 "b", 3-4 "a"
    // node types : 0,1,2 "x", 3 "y", 4 None
    fn typed_graph() -> TypedGraph {
        let mut builder = TypedGraphBuilder::new(5, false);
        builder.add_edge(0, 1, None, Some("a")).unwrap();
        builder.add_edge(1, 2, None, Some("a")).unwrap();
        builder.add_edge(0, 2, None, Some("b")).unwrap();
        builder.add_edge(1, 3, None, Some("b")).unwrap();
        builder.add_edge(3, 4, None, Some("a")).unwrap();
        for node in 0..3 {
            builder.set_node_type(node, Some("x")).unwrap();
        }
        builder.set_node_type(3, Some("y")).unwrap();
        builder.build().unwrap()
    }

    fn weight_of(transitions: &[(NodeId, EdgeId, f64)], dst: NodeId) -> f64 {
        transitions.iter().find(|t| t.0 == dst).unwrap().2
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1.0e-10, "expected {} got {}", b, a);
    }

    #[test]
    fn test_return_and_explore_factors() {
        log_init_test();
        let graph = typed_graph();
        let params = WalksParameters::new(10)
            .unwrap()
            .set_return_weight(Some(2.))
            .unwrap()
            .set_explore_weight(Some(5.))
            .unwrap();
        // at 1, coming from 0
        let previous = PreviousStep {
            node: 0,
            edge: graph.get_edge_id(0, 1).unwrap(),
        };
        let transitions =
            get_transition_weights(&graph, 1, Some(previous), params.get_single_walk_parameters());
        assert_eq!(transitions.len(), 3);
        // back to 0
        assert_close(weight_of(&transitions, 0), 2.);
        // 2 is a neighbour of 0, local move
        assert_close(weight_of(&transitions, 2), 1.);
        // 3 is not a neighbour of 0
        assert_close(weight_of(&transitions, 3), 5.);
        //
        let probas =
            get_transition_probabilities(&graph, 1, Some(previous), params.get_single_walk_parameters());
        assert_close(probas.iter().map(|t| t.2).sum::<f64>(), 1.);
        assert_close(weight_of(&probas, 3), 5. / 8.);
    } // end of test_return_and_explore_factors

    #[test]
    fn test_type_factors() {
        log_init_test();
        let graph = typed_graph();
        let params = WalksParameters::new(10)
            .unwrap()
            .set_change_edge_type_weight(Some(3.))
            .unwrap()
            .set_change_node_type_weight(Some(7.))
            .unwrap();
        let single = params.get_single_walk_parameters();
        // at 1 coming from 0 by an edge of type "a"
        let previous = PreviousStep {
            node: 0,
            edge: graph.get_edge_id(0, 1).unwrap(),
        };
        let transitions = get_transition_weights(&graph, 1, Some(previous), single);
        // 1 -> 0 type a, node x : no change
        assert_close(weight_of(&transitions, 0), 1.);
        // 1 -> 2 type a, node x
        assert_close(weight_of(&transitions, 2), 1.);
        // 1 -> 3 type b, node y : both changes
        assert_close(weight_of(&transitions, 3), 21.);
        // at 3 coming from 1 (type b): 3 -> 4 type a and node type None differs from y
        let previous = PreviousStep {
            node: 1,
            edge: graph.get_edge_id(1, 3).unwrap(),
        };
        let transitions = get_transition_weights(&graph, 3, Some(previous), single);
        assert_close(weight_of(&transitions, 4), 21.);
        assert_close(weight_of(&transitions, 1), 7.);
        // first step: only node type factor
        let transitions = get_transition_weights(&graph, 1, None, single);
        assert_close(weight_of(&transitions, 3), 7.);
        assert_close(weight_of(&transitions, 0), 1.);
    } // end of test_type_factors

    #[test]
    fn test_first_order_ignores_previous() {
        log_init_test();
        let mut builder = TypedGraphBuilder::new(3, false);
        builder.add_edge(0, 1, Some(1.), None).unwrap();
        builder.add_edge(0, 2, Some(3.), None).unwrap();
        builder.add_edge(1, 2, Some(2.), None).unwrap();
        let graph = builder.build().unwrap();
        let params = WalksParameters::new(5).unwrap();
        let single = params.get_single_walk_parameters();
        let previous = PreviousStep {
            node: 1,
            edge: graph.get_edge_id(1, 0).unwrap(),
        };
        let with_previous = get_transition_probabilities(&graph, 0, Some(previous), single);
        let without = get_transition_probabilities(&graph, 0, None, single);
        assert_eq!(with_previous, without);
        assert_close(weight_of(&without, 1), 0.25);
        assert_close(weight_of(&without, 2), 0.75);
    } // end of test_first_order_ignores_previous

    #[test]
    fn test_directed_neighbourhood_uses_out_edges_of_previous() {
        log_init_test();
        // 0 -> 1, 1 -> 2, 1 -> 3, 2 -> 0 (in-edge of 0 only), 0 -> 3
        let mut builder = TypedGraphBuilder::new(4, true);
        builder.add_edge(0, 1, None, None).unwrap();
        builder.add_edge(1, 2, None, None).unwrap();
        builder.add_edge(1, 3, None, None).unwrap();
        builder.add_edge(2, 0, None, None).unwrap();
        builder.add_edge(0, 3, None, None).unwrap();
        let graph = builder.build().unwrap();
        let params = WalksParameters::new(5)
            .unwrap()
            .set_explore_weight(Some(4.))
            .unwrap();
        let previous = PreviousStep {
            node: 0,
            edge: graph.get_edge_id(0, 1).unwrap(),
        };
        let transitions =
            get_transition_weights(&graph, 1, Some(previous), params.get_single_walk_parameters());
        // 2 -> 0 exists but 0 -> 2 does not : 2 is outside the neighbourhood of 0
        assert_close(weight_of(&transitions, 2), 4.);
        // 0 -> 3 exists : local move
        assert_close(weight_of(&transitions, 3), 1.);
    } // end of test_directed_neighbourhood_uses_out_edges_of_previous

    #[test]
    fn test_normalize_by_degree() {
        log_init_test();
        let graph = typed_graph();
        let params = WalksParameters::new(5)
            .unwrap()
            .set_normalize_by_degree(Some(true));
        let transitions = get_transition_weights(&graph, 1, None, params.get_single_walk_parameters());
        // degrees : 0 -> 2, 2 -> 2, 3 -> 2
        assert_close(weight_of(&transitions, 0), 1. / 3.);
        assert_close(weight_of(&transitions, 3), 1. / 3.);
        let transitions = get_transition_weights(&graph, 3, None, params.get_single_walk_parameters());
        // 4 has degree 1, 1 has degree 3
        assert_close(weight_of(&transitions, 4), 0.5);
        assert_close(weight_of(&transitions, 1), 0.25);
    } // end of test_normalize_by_degree

    #[test]
    fn test_sample_step_respects_probabilities() {
        log_init_test();
        let graph = typed_graph();
        let params = WalksParameters::new(5)
            .unwrap()
            .set_explore_weight(Some(6.))
            .unwrap();
        let single = params.get_single_walk_parameters();
        let previous = PreviousStep {
            node: 0,
            edge: graph.get_edge_id(0, 1).unwrap(),
        };
        // expected : 0 -> 1/8, 2 -> 1/8, 3 -> 6/8
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1234);
        let mut buffer = TransitionBuffer::new();
        let nb_draws = 40_000;
        let mut counts = [0usize; 5];
        for _ in 0..nb_draws {
            let (next, edge) = buffer
                .sample_step(&graph, 1, Some(previous), single, &mut rng)
                .unwrap();
            assert_eq!(graph.get_edge_id(1, next), Some(edge));
            counts[next] += 1;
        }
        let freq3 = counts[3] as f64 / nb_draws as f64;
        let freq0 = counts[0] as f64 / nb_draws as f64;
        log::debug!("counts : {:?}", counts);
        assert!((freq3 - 0.75).abs() < 0.02);
        assert!((freq0 - 0.125).abs() < 0.02);
        assert_eq!(counts[1] + counts[4], 0);
    } // end of test_sample_step_respects_probabilities

    #[test]
    fn test_max_neighbours_restricts_candidates() {
        log_init_test();
        // star centered on 0 with 10 leaves
        let mut builder = TypedGraphBuilder::new(11, false);
        for leaf in 1..11 {
            builder.add_edge(0, leaf, Some(leaf as f64), None).unwrap();
        }
        let graph = builder.build().unwrap();
        let params = WalksParameters::new(5)
            .unwrap()
            .set_max_neighbours(Some(3))
            .unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(77);
        let mut buffer = TransitionBuffer::new();
        let mut seen = [false; 11];
        for _ in 0..2000 {
            let (next, _) = buffer
                .sample_step(&graph, 0, None, params.get_single_walk_parameters(), &mut rng)
                .unwrap();
            assert_eq!(buffer.candidates.len(), 3);
            seen[next] = true;
        }
        // subsets change at each step so every leaf is reached
        assert!(seen[1..].iter().all(|s| *s));
        // a trap has no step
        let mut builder = TypedGraphBuilder::new(2, true);
        builder.add_edge(0, 1, None, None).unwrap();
        let graph = builder.build().unwrap();
        assert!(buffer
            .sample_step(&graph, 1, None, params.get_single_walk_parameters(), &mut rng)
            .is_none());
    } // end of test_max_neighbours_restricts_candidates

    #[test]
    fn test_huge_weights_keep_sampling_exact() {
        log_init_test();
        // 0 - 1 type a, 1 - 2 type b, 1 - 3 type a
        let mut builder = TypedGraphBuilder::new(4, false);
        builder.add_edge(0, 1, None, Some("a")).unwrap();
        builder.add_edge(1, 2, None, Some("b")).unwrap();
        builder.add_edge(1, 3, None, Some("a")).unwrap();
        let graph = builder.build().unwrap();
        // product of factors for 2 is 1e400, out of f64 range
        let params = WalksParameters::new(2)
            .unwrap()
            .set_explore_weight(Some(1.0e200))
            .unwrap()
            .set_change_edge_type_weight(Some(1.0e200))
            .unwrap();
        let single = params.get_single_walk_parameters();
        let previous = PreviousStep {
            node: 0,
            edge: graph.get_edge_id(0, 1).unwrap(),
        };
        let probas = get_transition_probabilities(&graph, 1, Some(previous), single);
        assert!(probas.iter().all(|t| t.2.is_finite()));
        assert_close(weight_of(&probas, 2), 1.);
        assert_close(weight_of(&probas, 3), 0.);
        assert_close(weight_of(&probas, 0), 0.);
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4321);
        let mut buffer = TransitionBuffer::new();
        for _ in 0..2000 {
            let (next, _) = buffer
                .sample_step(&graph, 1, Some(previous), single, &mut rng)
                .unwrap();
            assert_eq!(next, 2);
        }
    } // end of test_huge_weights_keep_sampling_exact
} // end of mod tests
