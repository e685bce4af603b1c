// src/dag/reach.rs

//! Reachability queries over a [`Graph`].
//!
//! All walks are iterative (explicit stack + visited set) so deep graphs do
//! not hit recursion limits.

use std::collections::BTreeSet;

use super::graph::{Graph, NodeId};

/// Every node reachable from `starts` along forward edges, starts included.
pub fn forward_reachable<I>(graph: &Graph, starts: I) -> BTreeSet<NodeId>
where
    I: IntoIterator<Item = NodeId>,
{
    let mut visited = BTreeSet::new();
    let mut stack: Vec<NodeId> = starts.into_iter().collect();

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        stack.extend(graph.successors(node).iter().filter(|n| !visited.contains(*n)));
    }

    visited
}

/// Topmost ancestors of `node`: the nodes without predecessors found by
/// walking backward from it. A node without predecessors is its own top.
pub fn top_ancestors(graph: &Graph, node: NodeId) -> BTreeSet<NodeId> {
    let mut tops = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        let preds = graph.predecessors(current);
        if preds.is_empty() {
            tops.insert(current);
        } else {
            stack.extend(preds.iter().filter(|n| !visited.contains(*n)));
        }
    }

    tops
}

/// Whether some node in `targets` is reachable from `start` (or is `start`).
pub fn reaches_any(graph: &Graph, start: NodeId, targets: &BTreeSet<NodeId>) -> bool {
    let mut visited = BTreeSet::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if targets.contains(&node) {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        stack.extend(graph.successors(node).iter().filter(|n| !visited.contains(*n)));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    /// 0     1
    /// |   / |
    /// 2  3  4      (3 has no predecessor)
    ///  \ |
    ///    5   6     (6 only from 4)
    /// ```
    fn sample() -> Graph {
        let mut g = Graph::new();
        g.push_layer(2); // 0, 1
        g.push_layer(3); // 2, 3, 4
        g.push_layer(2); // 5, 6
        g.add_edge(0, 2);
        g.add_edge(1, 4);
        g.add_edge(2, 5);
        g.add_edge(3, 5);
        g.add_edge(4, 6);
        g
    }

    #[test]
    fn forward_reachable_includes_starts() {
        let g = sample();
        let reach = forward_reachable(&g, [0]);
        assert_eq!(reach, BTreeSet::from([0, 2, 5]));
    }

    #[test]
    fn top_ancestors_collects_all_roots() {
        let g = sample();
        assert_eq!(top_ancestors(&g, 5), BTreeSet::from([0, 3]));
        assert_eq!(top_ancestors(&g, 3), BTreeSet::from([3]));
        assert_eq!(top_ancestors(&g, 6), BTreeSet::from([1]));
    }

    #[test]
    fn reaches_any_stops_at_first_target() {
        let g = sample();
        assert!(reaches_any(&g, 3, &BTreeSet::from([5])));
        assert!(reaches_any(&g, 6, &BTreeSet::from([6])));
        assert!(!reaches_any(&g, 1, &BTreeSet::from([5])));
    }

    #[test]
    fn deep_chains_do_not_overflow() {
        let mut g = Graph::new();
        let mut prev = g.push_layer(1)[0];
        for _ in 0..50_000 {
            let next = g.push_layer(1)[0];
            g.add_edge(prev, next);
            prev = next;
        }
        assert_eq!(top_ancestors(&g, prev), BTreeSet::from([0]));
        assert_eq!(forward_reachable(&g, [0]).len(), 50_001);
    }
}
