#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeSet;

use petgraph::unionfind::UnionFind;
use proptest::prelude::*;

use common::curve_builder;
use dagsynth::dag::reach::forward_reachable;
use dagsynth::dag::stats::max_edge_count;
use dagsynth::dag::validate::{verify, verify_acyclic, verify_weakly_connected};
use dagsynth::dag::{CurvePoints, DagParams, LayerCapacity, MIN_LAYERS, NodeCountCurve};
use dagsynth_test_utils::seeded_rng;

// Small enough to keep each case cheap, large enough to hit skip edges,
// several layer-0 nodes and synthetic exits.
fn params_strategy() -> impl Strategy<Value = (DagParams, u32, u64)> {
    (
        1usize..=12,
        0usize..=6,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        1u32..=8,
        any::<u64>(),
    )
        .prop_map(
            |(max_layer, skip_layer_budget, single_entry, single_exit, density, layer_node, seed)| {
                (
                    DagParams {
                        max_layer,
                        skip_layer_budget,
                        single_entry,
                        single_exit,
                        density,
                    },
                    layer_node,
                    seed,
                )
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn edges_only_point_to_later_layers((params, layer_node, seed) in params_strategy()) {
        let dag = curve_builder(params, layer_node).build(&mut seeded_rng(seed));
        let g = &dag.graph;

        for (src, dst) in g.edges() {
            let (a, b) = (g.layer_index(src).unwrap(), g.layer_index(dst).unwrap());
            prop_assert!(a < b, "edge t{src} -> t{dst} goes from layer {a} to {b}");
        }
        prop_assert!(verify_acyclic(g).is_ok());
    }

    #[test]
    fn depth_and_widths_follow_params((params, layer_node, seed) in params_strategy()) {
        let dag = curve_builder(params, layer_node).build(&mut seeded_rng(seed));
        let curve = NodeCountCurve::fit(CurvePoints::from_layer_node(
            params.max_layer as i64,
            layer_node,
        ))
        .unwrap();

        let max = params.max_layer.max(MIN_LAYERS);
        prop_assert!((MIN_LAYERS..=max).contains(&dag.stats.layer_count));

        let sizes = dag.graph.layer_sizes();
        for (idx, &size) in sizes.iter().take(dag.stats.layer_count).enumerate() {
            let cap = if idx == 0 && params.single_entry { 1 } else { curve.capacity(idx) };
            prop_assert!(size >= 1 && size <= cap, "layer {idx}: {size} nodes, capacity {cap}");
        }
    }

    #[test]
    fn repaired_graph_hangs_together((params, layer_node, seed) in params_strategy()) {
        let dag = curve_builder(params, layer_node).build(&mut seeded_rng(seed));
        let g = &dag.graph;
        let last = g.layer_count() - 1;

        // Every node outside the last layer leads somewhere, every node of
        // the last layer is fed by something.
        for layer in &g.layers()[..last] {
            for &node in layer {
                prop_assert!(g.has_successor(node));
            }
        }
        for &node in g.layer(last) {
            prop_assert!(g.has_predecessor(node));
        }

        if params.single_exit {
            prop_assert!(verify_weakly_connected(g).is_ok());
        }
    }

    #[test]
    fn orphan_repair_leaves_no_islands((params, layer_node, seed) in params_strategy()) {
        // Without density or a single exit nothing else ties the graph
        // together, so this is the mode the orphan repair alone answers for.
        let params = DagParams { density: false, single_exit: false, ..params };
        let dag = curve_builder(params, layer_node).build(&mut seeded_rng(seed));
        let g = &dag.graph;

        let mut components = UnionFind::<usize>::new(g.node_count());
        for (src, dst) in g.edges() {
            components.union(src as usize, dst as usize);
        }
        let rooted: BTreeSet<usize> = g
            .layer(0)
            .iter()
            .map(|&n| components.find(n as usize))
            .collect();

        for node in g.nodes() {
            prop_assert!(
                rooted.contains(&components.find(node as usize)),
                "t{node} sits in a component without a layer-0 node"
            );
        }
    }

    #[test]
    fn density_mode_reaches_everything((params, layer_node, seed) in params_strategy()) {
        let params = DagParams { density: true, ..params };
        let dag = curve_builder(params, layer_node).build(&mut seeded_rng(seed));
        let g = &dag.graph;

        for layer in &g.layers()[1..] {
            for &node in layer {
                prop_assert!(g.has_predecessor(node), "t{node} has no predecessor");
            }
        }
        let reached = forward_reachable(g, g.layer(0).iter().copied());
        prop_assert_eq!(reached.len(), g.node_count());
    }

    #[test]
    fn single_entry_and_exit_hold((params, layer_node, seed) in params_strategy()) {
        let builder = curve_builder(params, layer_node);
        let dag = builder.build(&mut seeded_rng(seed));
        let g = &dag.graph;

        if params.single_entry {
            prop_assert_eq!(g.layer(0).len(), 1);
        }
        if params.single_exit {
            prop_assert_eq!(g.layer(g.layer_count() - 1).len(), 1);
            let synthetic = g.layer_count() == dag.stats.layer_count + 1;
            if synthetic {
                prop_assert!(g.layer(g.layer_count() - 2).len() > 1);
            } else {
                prop_assert_eq!(g.layer_count(), dag.stats.layer_count);
            }
        } else {
            prop_assert_eq!(g.layer_count(), dag.stats.layer_count);
        }
        prop_assert!(verify(g, builder.params()).is_ok());
    }

    #[test]
    fn edge_density_without_skip_edges((params, layer_node, seed) in params_strategy()) {
        let params = DagParams { skip_layer_budget: 0, ..params };
        let dag = curve_builder(params, layer_node).build(&mut seeded_rng(seed));
        let stats = &dag.stats;

        let expected = stats.edge_count as f64 / max_edge_count(&stats.nodes_per_layer) as f64;
        prop_assert!(stats.edge_density > 0.0 && stats.edge_density <= 1.0);
        prop_assert!((stats.edge_density - expected).abs() < 1e-12);
        prop_assert_eq!(stats.edge_count, dag.graph.edge_count());
    }

    #[test]
    fn same_seed_same_dag((params, layer_node, seed) in params_strategy()) {
        let builder = curve_builder(params, layer_node);
        let a = builder.build(&mut seeded_rng(seed));
        let b = builder.build(&mut seeded_rng(seed));
        prop_assert_eq!(a.graph.forward_edges(), b.graph.forward_edges());
        prop_assert_eq!(a.stats, b.stats);
    }
}
