// src/workflow/dot.rs

//! Graphviz export. Rendering the `.dot` files is left to the `dot` tool.

use petgraph::Graph as PetGraph;
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;

use crate::dag::{Graph, task_name};

/// DOT source for a generated graph, nodes labelled `t<id>`.
pub fn to_dot(graph: &Graph) -> String {
    // Edge weights must be `Display` for `Dot`, so edges carry an empty label.
    let mut pg: PetGraph<String, &'static str> =
        PetGraph::with_capacity(graph.node_count(), graph.edge_count());

    // Node ids are contiguous, so the id doubles as a position into `index`.
    let mut index = vec![NodeIndex::end(); graph.node_count()];
    for node in graph.nodes() {
        index[node as usize] = pg.add_node(task_name(node));
    }
    for (src, dst) in graph.edges() {
        pg.add_edge(index[src as usize], index[dst as usize], "");
    }

    let dot = Dot::with_attr_getters(
        &pg,
        &[Config::EdgeNoLabel],
        &|_, _| String::new(),
        &|_, _| "shape = circle".to_string(),
    );
    format!("{dot}")
}
