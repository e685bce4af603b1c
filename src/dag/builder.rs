// src/dag/builder.rs

//! Random layered DAG construction.
//!
//! A build runs these phases strictly in order, each one seeing every edge
//! added by the previous phases:
//!
//! 1. draw the depth and the size of every layer
//! 2. wire every node to one random node of the next layer
//! 3. add skip edges jumping two or three layers ahead
//! 4. give every predecessor-less node of the last layer an incoming edge
//! 5. repair connectivity (density mode or orphan analysis)
//! 6. append a synthetic exit node if a single exit is requested

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, warn};

use super::curve::LayerCapacity;
use super::graph::{Graph, NodeId};
use super::reach::{forward_reachable, reaches_any, top_ancestors};
use super::stats::GenerationStats;

/// Smallest depth a generated DAG may have.
pub const MIN_LAYERS: usize = 3;

/// Jump distances for skip edges with their relative weights. A distance of
/// 0 means the attempt is dropped.
const SKIP_JUMPS: [(usize, u32); 3] = [(0, 3), (2, 5), (3, 2)];

/// Topology options for one DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DagParams {
    pub max_layer: usize,
    /// Upper bound on the number of skip-edge attempts.
    pub skip_layer_budget: usize,
    pub single_entry: bool,
    pub single_exit: bool,
    /// Every interior node gets a predecessor, instead of the orphan analysis.
    pub density: bool,
}

impl Default for DagParams {
    fn default() -> Self {
        Self {
            max_layer: 100,
            skip_layer_budget: 5,
            single_entry: false,
            single_exit: true,
            density: false,
        }
    }
}

/// Output of one build.
#[derive(Debug, Clone)]
pub struct GeneratedDag {
    pub graph: Graph,
    pub stats: GenerationStats,
}

/// Builds random layered DAGs. Holds no per-build state, so one builder can
/// be shared across threads as long as each build gets its own RNG.
#[derive(Debug, Clone)]
pub struct DagBuilder<C> {
    params: DagParams,
    capacity: C,
}

impl<C: LayerCapacity> DagBuilder<C> {
    pub fn new(mut params: DagParams, capacity: C) -> Self {
        if params.max_layer < MIN_LAYERS {
            warn!(
                requested = params.max_layer,
                "max_layer below the minimum of {MIN_LAYERS}; raising it to {MIN_LAYERS}"
            );
            params.max_layer = MIN_LAYERS;
        }
        Self { params, capacity }
    }

    pub fn params(&self) -> &DagParams {
        &self.params
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedDag {
        let layer_count = rng.gen_range(MIN_LAYERS..=self.params.max_layer);

        let mut graph = self.assign_layers(layer_count, rng);
        wire_sequential(&mut graph, rng);
        add_skip_edges(&mut graph, self.params.skip_layer_budget, rng);
        fix_last_layer(&mut graph, rng);

        if self.params.density {
            repair_density(&mut graph, rng);
        } else {
            repair_connectivity(&mut graph, rng);
        }

        if self.params.single_exit {
            add_single_exit(&mut graph);
        }

        let stats = GenerationStats::from_graph(layer_count, &graph);
        debug!(
            layer_count,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            edge_density = stats.edge_density,
            "built DAG"
        );

        GeneratedDag { graph, stats }
    }

    fn assign_layers<R: Rng + ?Sized>(&self, layer_count: usize, rng: &mut R) -> Graph {
        let mut graph = Graph::new();

        for layer in 0..layer_count {
            let size = if layer == 0 && self.params.single_entry {
                1
            } else {
                rng.gen_range(1..=self.capacity.capacity(layer).max(1))
            };

            let mut ids = graph.push_layer(size);
            ids.shuffle(rng);
            graph.reorder_layer(layer, ids);
        }

        graph
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, nodes: &[NodeId]) -> NodeId {
    nodes[rng.gen_range(0..nodes.len())]
}

/// Every node outside the last layer points at one random node of the next.
fn wire_sequential<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) {
    for idx in 0..graph.layer_count() - 1 {
        let sources = graph.layer(idx).to_vec();
        let targets = graph.layer(idx + 1).to_vec();
        for src in sources {
            graph.add_edge(src, pick(rng, &targets));
        }
    }
}

fn add_skip_edges<R: Rng + ?Sized>(graph: &mut Graph, budget: usize, rng: &mut R) {
    let layer_count = graph.layer_count();
    if layer_count < 4 || budget <= 1 {
        return;
    }

    // Sources never come from the last three layers, so a jump of three
    // always lands inside the graph.
    let candidates = layer_count - 3;
    let attempts = rng.gen_range(1..=budget);
    let mut added = 0usize;

    for _ in 0..attempts {
        let src_layer = rng.gen_range(0..candidates);
        let distance = SKIP_JUMPS
            .choose_weighted(rng, |&(_, weight)| weight)
            .map(|&(distance, _)| distance)
            .unwrap_or(0);
        if distance == 0 {
            continue;
        }

        let src = pick(rng, graph.layer(src_layer));
        let dst = pick(rng, graph.layer(src_layer + distance));
        if graph.add_edge(src, dst) {
            added += 1;
        }
    }

    debug!(attempts, added, "skip edges");
}

fn fix_last_layer<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) {
    let last = graph.layer_count() - 1;
    let sources = graph.layer(last - 1).to_vec();
    for node in graph.layer(last).to_vec() {
        if !graph.has_predecessor(node) {
            graph.add_edge(pick(rng, &sources), node);
        }
    }
}

/// Give every predecessor-less node of an interior layer an edge from the
/// layer above.
fn repair_density<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) {
    let last = graph.layer_count() - 1;
    for idx in 1..last {
        let sources = graph.layer(idx - 1).to_vec();
        for node in graph.layer(idx).to_vec() {
            if !graph.has_predecessor(node) {
                graph.add_edge(pick(rng, &sources), node);
            }
        }
    }
}

/// Reconnect subgraphs that are not attached to the rest of the DAG.
///
/// Nodes without successors start out as orphan candidates. Those reachable
/// from layer 0 are terminals. A remaining candidate is also a terminal if
/// one of its topmost ancestors reaches a terminal. Whatever is left is a
/// true orphan, and each of its topmost ancestors gets an edge from a random
/// node of the layer above.
fn repair_connectivity<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) {
    let reachable = forward_reachable(graph, graph.layer(0).iter().copied());

    let mut terminals = BTreeSet::new();
    let mut candidates = Vec::new();
    for node in graph.nodes().filter(|&n| !graph.has_successor(n)) {
        if reachable.contains(&node) {
            terminals.insert(node);
        } else {
            candidates.push(node);
        }
    }

    let mut orphans = Vec::new();
    for node in candidates {
        let tops = top_ancestors(graph, node);
        if tops.iter().any(|&top| reaches_any(graph, top, &terminals)) {
            terminals.insert(node);
        } else {
            orphans.push(node);
        }
    }

    if orphans.is_empty() {
        return;
    }

    let orphan_tops: BTreeSet<NodeId> = orphans
        .iter()
        .flat_map(|&node| top_ancestors(graph, node))
        .collect();
    debug!(
        orphans = orphans.len(),
        tops = orphan_tops.len(),
        "reconnecting orphan subgraphs"
    );

    // Layer 0 nodes are always reachable, so no orphan top lives there.
    for idx in 1..graph.layer_count() {
        let sources = graph.layer(idx - 1).to_vec();
        for node in graph.layer(idx).to_vec() {
            if orphan_tops.contains(&node) {
                graph.add_edge(pick(rng, &sources), node);
            }
        }
    }
}

fn add_single_exit(graph: &mut Graph) {
    let last = graph.layer(graph.layer_count() - 1).to_vec();
    if last.len() <= 1 {
        return;
    }

    let exit = graph.push_layer(1)[0];
    for node in last {
        graph.add_edge(node, exit);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::dag::reach::forward_reachable;

    fn params() -> DagParams {
        DagParams {
            max_layer: 8,
            skip_layer_budget: 0,
            single_entry: false,
            single_exit: false,
            density: false,
        }
    }

    fn fixed(width: usize) -> impl Fn(usize) -> usize {
        move |_| width
    }

    #[test]
    fn depth_is_drawn_between_three_and_max_layer() {
        let builder = DagBuilder::new(params(), fixed(3));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let dag = builder.build(&mut rng);
            assert!((3..=8).contains(&dag.stats.layer_count));
            assert_eq!(dag.graph.layer_count(), dag.stats.layer_count);
        }
    }

    #[test]
    fn small_max_layer_is_raised_to_three() {
        let builder = DagBuilder::new(DagParams { max_layer: 1, ..params() }, fixed(2));
        assert_eq!(builder.params().max_layer, MIN_LAYERS);
        let dag = builder.build(&mut StdRng::seed_from_u64(1));
        assert_eq!(dag.stats.layer_count, 3);
    }

    #[test]
    fn layer_sizes_respect_capacity() {
        let builder = DagBuilder::new(params(), |layer: usize| layer + 1);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let dag = builder.build(&mut rng);
            for (idx, size) in dag.graph.layer_sizes().into_iter().enumerate() {
                assert!(size >= 1 && size <= idx + 1, "layer {idx} has {size} nodes");
            }
        }
    }

    #[test]
    fn every_non_last_node_has_a_successor() {
        let builder = DagBuilder::new(params(), fixed(5));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let dag = builder.build(&mut rng);
            let g = &dag.graph;
            for layer in &g.layers()[..g.layer_count() - 1] {
                for &node in layer {
                    assert!(g.has_successor(node));
                }
            }
            for &node in g.layer(g.layer_count() - 1) {
                assert!(g.has_predecessor(node));
            }
        }
    }

    #[test]
    fn single_entry_and_exit() {
        let builder = DagBuilder::new(
            DagParams {
                single_entry: true,
                single_exit: true,
                ..params()
            },
            fixed(4),
        );
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let dag = builder.build(&mut rng);
            let g = &dag.graph;
            assert_eq!(g.layer(0).len(), 1);
            assert_eq!(g.layer(g.layer_count() - 1).len(), 1);
            assert!(g.layer_count() == dag.stats.layer_count
                || g.layer_count() == dag.stats.layer_count + 1);
        }
    }

    #[test]
    fn synthetic_exit_collects_former_last_layer() {
        let builder = DagBuilder::new(
            DagParams {
                single_exit: true,
                ..params()
            },
            fixed(6),
        );
        let mut rng = StdRng::seed_from_u64(21);
        let mut saw_synthetic = false;
        for _ in 0..100 {
            let dag = builder.build(&mut rng);
            let g = &dag.graph;
            if g.layer_count() == dag.stats.layer_count + 1 {
                saw_synthetic = true;
                let exit = g.layer(g.layer_count() - 1)[0];
                assert_eq!(exit as usize, g.node_count() - 1);
                let former = g.layer(g.layer_count() - 2);
                assert!(former.len() > 1);
                assert_eq!(g.predecessors(exit).len(), former.len());
            }
        }
        assert!(saw_synthetic);
    }

    #[test]
    fn density_mode_gives_interior_nodes_a_predecessor() {
        let builder = DagBuilder::new(DagParams { density: true, ..params() }, fixed(6));
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let dag = builder.build(&mut rng);
            let g = &dag.graph;
            for layer in &g.layers()[1..] {
                for &node in layer {
                    assert!(g.has_predecessor(node));
                }
            }
            let reach = forward_reachable(g, g.layer(0).iter().copied());
            assert_eq!(reach.len(), g.node_count());
        }
    }

    #[test]
    fn orphan_subgraph_is_reattached() {
        // Layer 1 node 2 has no predecessor and its only path ends in 4,
        // which nothing reachable from layer 0 touches.
        let mut g = Graph::new();
        g.push_layer(1); // 0
        g.push_layer(2); // 1, 2
        g.push_layer(2); // 3, 4
        g.add_edge(0, 1);
        g.add_edge(1, 3);
        g.add_edge(2, 4);

        repair_connectivity(&mut g, &mut StdRng::seed_from_u64(0));

        assert!(g.predecessors(2).contains(&0));
        let reach = forward_reachable(&g, [0]);
        assert_eq!(reach.len(), 5);
    }

    #[test]
    fn false_orphan_is_left_alone() {
        // 2 has no predecessor but feeds 3, which is reachable from 0, and
        // also feeds 4. 4 is therefore attached through 2 and not repaired.
        let mut g = Graph::new();
        g.push_layer(1); // 0
        g.push_layer(2); // 1, 2
        g.push_layer(2); // 3, 4
        g.add_edge(0, 1);
        g.add_edge(1, 3);
        g.add_edge(2, 3);
        g.add_edge(2, 4);

        let before = g.edge_count();
        repair_connectivity(&mut g, &mut StdRng::seed_from_u64(0));
        assert_eq!(g.edge_count(), before);
    }

    #[test]
    fn skip_edges_only_when_budget_above_one() {
        let fixed_params = DagParams {
            max_layer: 10,
            skip_layer_budget: 1,
            ..params()
        };
        let builder = DagBuilder::new(fixed_params, fixed(1));
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let dag = builder.build(&mut rng);
            // One node per layer: a plain chain, no room for anything else.
            assert_eq!(dag.graph.edge_count(), dag.graph.layer_count() - 1);
        }

        let builder = DagBuilder::new(
            DagParams {
                skip_layer_budget: 8,
                ..fixed_params
            },
            fixed(1),
        );
        let mut skipped = false;
        for _ in 0..50 {
            let dag = builder.build(&mut rng);
            let g = &dag.graph;
            for (src, dst) in g.edges() {
                let span = g.layer_index(dst).unwrap() - g.layer_index(src).unwrap();
                assert!(matches!(span, 1..=3));
                skipped |= span > 1;
            }
        }
        assert!(skipped);
    }

    #[test]
    fn same_seed_same_graph() {
        let builder = DagBuilder::new(
            DagParams {
                skip_layer_budget: 4,
                ..params()
            },
            fixed(4),
        );
        let a = builder.build(&mut StdRng::seed_from_u64(42));
        let b = builder.build(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.graph.layers(), b.graph.layers());
        assert_eq!(a.graph.forward_edges(), b.graph.forward_edges());
        assert_eq!(a.stats, b.stats);
    }
}
