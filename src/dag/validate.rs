// src/dag/validate.rs

//! Structural checks for generated graphs.
//!
//! A failure here means the builder has a bug; the batch runner calls
//! [`verify`] only when asked to (`--verify`).

use petgraph::algo::{connected_components, toposort};

use super::builder::DagParams;
use super::graph::{Graph, task_name};
use crate::errors::{DagSynthError, Result};

/// Check every invariant a built graph must satisfy for `params`.
pub fn verify(graph: &Graph, params: &DagParams) -> Result<()> {
    verify_forward_edges(graph)?;
    verify_acyclic(graph)?;

    // Every node has a path to the single exit, so the graph is one
    // component. Without it, several layer-0 nodes may head separate chains.
    if params.single_exit {
        verify_weakly_connected(graph)?;
    }

    if params.single_entry && graph.layer(0).len() != 1 {
        return Err(violation(format!(
            "single entry requested but layer 0 has {} nodes",
            graph.layer(0).len()
        )));
    }

    let last = graph.layer_count() - 1;
    if params.single_exit && graph.layer(last).len() != 1 {
        return Err(violation(format!(
            "single exit requested but the last layer has {} nodes",
            graph.layer(last).len()
        )));
    }

    if params.density {
        for layer in &graph.layers()[1..last] {
            if let Some(&node) = layer.iter().find(|&&n| !graph.has_predecessor(n)) {
                return Err(violation(format!(
                    "density requested but interior node {} has no predecessor",
                    task_name(node)
                )));
            }
        }
    }

    Ok(())
}

/// Every edge goes from a strictly lower to a strictly higher layer.
pub fn verify_forward_edges(graph: &Graph) -> Result<()> {
    for (src, dst) in graph.edges() {
        match (graph.layer_index(src), graph.layer_index(dst)) {
            (Some(a), Some(b)) if a < b => {}
            _ => {
                return Err(violation(format!(
                    "edge {} -> {} does not point to a later layer",
                    task_name(src),
                    task_name(dst)
                )));
            }
        }
    }
    Ok(())
}

pub fn verify_acyclic(graph: &Graph) -> Result<()> {
    toposort(&graph.to_graphmap(), None)
        .map(|_| ())
        .map_err(|cycle| {
            violation(format!(
                "cycle detected involving {}",
                task_name(cycle.node_id())
            ))
        })
}

/// The graph forms a single weakly connected component.
pub fn verify_weakly_connected(graph: &Graph) -> Result<()> {
    let components = connected_components(&graph.to_graphmap());
    if components > 1 {
        return Err(violation(format!(
            "graph splits into {components} disconnected components"
        )));
    }
    Ok(())
}

fn violation(msg: String) -> DagSynthError {
    DagSynthError::InvariantViolation(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_disconnected_islands() {
        let mut g = Graph::new();
        g.push_layer(2);
        g.push_layer(2);
        g.add_edge(0, 2);
        g.add_edge(1, 3);
        match verify_weakly_connected(&g) {
            Err(DagSynthError::InvariantViolation(msg)) => assert!(msg.contains("2 disconnected")),
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn density_violation_names_the_node() {
        let mut g = Graph::new();
        g.push_layer(1);
        g.push_layer(2);
        g.push_layer(1);
        g.add_edge(0, 1);
        g.add_edge(1, 3);
        g.add_edge(2, 3);
        let params = DagParams {
            max_layer: 3,
            skip_layer_budget: 0,
            single_entry: true,
            single_exit: true,
            density: true,
        };
        match verify(&g, &params) {
            Err(DagSynthError::InvariantViolation(msg)) => assert!(msg.contains("t2")),
            other => panic!("expected violation, got {other:?}"),
        }
    }
}
