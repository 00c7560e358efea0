//! Statistics on walks: distinct nodes visited, edge type and node type switch rates.

use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;

use crate::graph::{NodeId, WalkGraphT};

/// number of distinct nodes in a walk
pub fn count_distinct_nodes(walk: &[NodeId]) -> usize {
    let mut seen = HashSet::<NodeId, ahash::RandomState>::default();
    walk.iter().filter(|node| seen.insert(**node)).count()
}

/// fraction of consecutive edge pairs of the walk having different types.
/// Walks with less than 2 edges have rate 0.
pub fn edge_type_switch_rate<G: WalkGraphT>(graph: &G, walk: &[NodeId]) -> f64 {
    if walk.len() < 3 {
        return 0.;
    }
    let edge_types: Vec<_> = walk
        .windows(2)
        .map(|pair| {
            graph
                .get_edge_id(pair[0], pair[1])
                .and_then(|edge| graph.get_edge_type_id(edge))
        })
        .collect();
    let nb_switch = edge_types.windows(2).filter(|t| t[0] != t[1]).count();
    nb_switch as f64 / (edge_types.len() - 1) as f64
} // end of edge_type_switch_rate

/// fraction of steps of the walk going to a node of another type
pub fn node_type_switch_rate<G: WalkGraphT>(graph: &G, walk: &[NodeId]) -> f64 {
    if walk.len() < 2 {
        return 0.;
    }
    let nb_switch = walk
        .windows(2)
        .filter(|pair| graph.get_node_type_id(pair[0]) != graph.get_node_type_id(pair[1]))
        .count();
    nb_switch as f64 / (walk.len() - 1) as f64
} // end of node_type_switch_rate

/// Means over a batch of walks
#[derive(Clone, Debug, Default)]
pub struct WalksSummary {
    pub nb_walks: usize,
    /// mean number of nodes
    pub mean_length: f64,
    pub mean_distinct_nodes: f64,
    pub mean_edge_type_switch_rate: f64,
    pub mean_node_type_switch_rate: f64,
}

impl WalksSummary {
    pub fn new<G: WalkGraphT + Sync>(graph: &G, walks: &[Vec<NodeId>]) -> Self {
        let nb_walks = walks.len();
        if nb_walks == 0 {
            return WalksSummary::default();
        }
        let (length, distinct, edge_rate, node_rate) = walks
            .par_iter()
            .map(|walk| {
                (
                    walk.len() as f64,
                    count_distinct_nodes(walk) as f64,
                    edge_type_switch_rate(graph, walk),
                    node_type_switch_rate(graph, walk),
                )
            })
            .reduce(
                || (0., 0., 0., 0.),
                |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3),
            );
        let n = nb_walks as f64;
        WalksSummary {
            nb_walks,
            mean_length: length / n,
            mean_distinct_nodes: distinct / n,
            mean_edge_type_switch_rate: edge_rate / n,
            mean_node_type_switch_rate: node_rate / n,
        }
    } // end of new
} // end of impl WalksSummary

impl fmt::Display for WalksSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nb walks : {}, mean length : {:.3}, mean distinct nodes : {:.3}, edge type switch rate : {:.3e}, node type switch rate : {:.3e}",
            self.nb_walks,
            self.mean_length,
            self.mean_distinct_nodes,
            self.mean_edge_type_switch_rate,
            self.mean_node_type_switch_rate
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::{small_world_graph, SmallWorldParams};
    use crate::graph::{TypedGraph, TypedGraphBuilder};
    use crate::tools::correlation::{pearson_cor, pearson_t_statistic};
    use crate::walks::{Walker, WalksParameters};

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // quantile of student law with 48 degrees of freedom at 0.995
    const T_48_001: f64 = 2.682;

    const NB_SWEEP: usize = 50;

    fn typed_small_world() -> TypedGraph {
        let params = SmallWorldParams::new(200, 4, 0.1, 1234)
            .with_node_type_weights(&[0.9, 0.1])
            .with_edge_type_weights(&[0.95, 0.05]);
        small_world_graph(&params).unwrap()
    }

    fn sweep_values() -> Vec<f64> {
        (0..NB_SWEEP)
            .map(|i| 0.01 + i as f64 * (10. - 0.01) / (NB_SWEEP - 1) as f64)
            .collect()
    }

    // correlation between swept weight and mean of metric over one walk of length 100 by node
    fn sweep_correlation<S, M>(graph: &TypedGraph, set_weight: S, metric: M) -> f64
    where
        S: Fn(WalksParameters, f64) -> WalksParameters,
        M: Fn(&TypedGraph, &[NodeId]) -> f64,
    {
        let xs = sweep_values();
        let ys: Vec<f64> = xs
            .iter()
            .map(|x| {
                let params = set_weight(WalksParameters::new(100).unwrap(), *x);
                let walks = graph.walk(&params).unwrap();
                walks.iter().map(|walk| metric(graph, walk)).sum::<f64>() / walks.len() as f64
            })
            .collect();
        log::debug!("first mean : {:.3e}, last mean : {:.3e}", ys[0], ys[NB_SWEEP - 1]);
        let r = pearson_cor(&xs, &ys);
        let t = pearson_t_statistic(r, NB_SWEEP);
        log::info!("correlation : {:.3}, t : {:.3}", r, t);
        assert!(t.abs() > T_48_001);
        r
    }

    fn distinct_nodes(_graph: &TypedGraph, walk: &[NodeId]) -> f64 {
        count_distinct_nodes(walk) as f64
    }

    #[test]
    fn test_switch_rates() {
        log_init_test();
        // path 0 - 1 - 2 - 3 with edge types a a b, node types x y y x
        let mut builder = TypedGraphBuilder::new(4, false);
        builder.add_edge(0, 1, None, Some("a")).unwrap();
        builder.add_edge(1, 2, None, Some("a")).unwrap();
        builder.add_edge(2, 3, None, Some("b")).unwrap();
        for (node, t) in ["x", "y", "y", "x"].iter().enumerate() {
            builder.set_node_type(node, Some(*t)).unwrap();
        }
        let graph = builder.build().unwrap();
        let walk = vec![0, 1, 2, 3, 2];
        assert_eq!(count_distinct_nodes(&walk), 4);
        // types a a b b : one switch out of 3 pairs
        assert!((edge_type_switch_rate(&graph, &walk) - 1. / 3.).abs() < 1.0e-12);
        // x->y, y->y, y->x, x->y
        assert!((node_type_switch_rate(&graph, &walk) - 0.75).abs() < 1.0e-12);
        assert_eq!(edge_type_switch_rate(&graph, &[0, 1]), 0.);
        assert_eq!(node_type_switch_rate(&graph, &[3]), 0.);
        //
        let summary = WalksSummary::new(&graph, &[walk, vec![3]]);
        assert_eq!(summary.nb_walks, 2);
        assert!((summary.mean_length - 3.).abs() < 1.0e-12);
        assert!((summary.mean_distinct_nodes - 2.5).abs() < 1.0e-12);
        log::info!("{}", summary);
    } // end of test_switch_rates

    #[test]
    fn test_return_weight_limits_exploration() {
        log_init_test();
        let graph = typed_small_world();
        let r = sweep_correlation(
            &graph,
            |params, x| params.set_return_weight(Some(x)).unwrap(),
            distinct_nodes,
        );
        assert!(r < -0.9);
    }

    #[test]
    fn test_explore_weight_increases_exploration() {
        log_init_test();
        let graph = typed_small_world();
        let r = sweep_correlation(
            &graph,
            |params, x| params.set_explore_weight(Some(x)).unwrap(),
            distinct_nodes,
        );
        assert!(r > 0.6);
    }

    #[test]
    fn test_change_edge_type_weight_increases_switches() {
        log_init_test();
        let graph = typed_small_world();
        let r = sweep_correlation(
            &graph,
            |params, x| params.set_change_edge_type_weight(Some(x)).unwrap(),
            |g, walk| edge_type_switch_rate(g, walk),
        );
        assert!(r > 0.9);
    }

    #[test]
    fn test_change_node_type_weight_increases_switches() {
        log_init_test();
        let graph = typed_small_world();
        let r = sweep_correlation(
            &graph,
            |params, x| params.set_change_node_type_weight(Some(x)).unwrap(),
            |g, walk| node_type_switch_rate(g, walk),
        );
        assert!(r > 0.8);
    }
} // end of mod tests
