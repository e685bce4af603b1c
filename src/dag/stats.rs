// src/dag/stats.rs

use serde::Serialize;

use super::graph::Graph;

/// Summary of one generated DAG.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    /// Depth drawn for this run, before any synthetic exit layer.
    pub layer_count: usize,
    /// Size of every layer of the final graph, synthetic exit included.
    pub nodes_per_layer: Vec<usize>,
    pub edge_count: usize,
    /// `edge_count / max_edge_count(nodes_per_layer)`. The maximum only
    /// counts adjacent-layer pairs, so skip edges can push this above 1.
    pub edge_density: f64,
    /// Whether the workflow built from this DAG was tagged as customized.
    pub customized: bool,
}

impl GenerationStats {
    pub fn from_graph(layer_count: usize, graph: &Graph) -> Self {
        let nodes_per_layer = graph.layer_sizes();
        let edge_count = graph.edge_count();
        let max_edges = max_edge_count(&nodes_per_layer);
        let edge_density = if max_edges == 0 {
            0.0
        } else {
            edge_count as f64 / max_edges as f64
        };

        Self {
            layer_count,
            nodes_per_layer,
            edge_count,
            edge_density,
            customized: false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes_per_layer.iter().sum()
    }

    /// Widest layer.
    pub fn width(&self) -> usize {
        self.nodes_per_layer.iter().copied().max().unwrap_or(0)
    }
}

/// Number of edges if every node were wired to every node of the next layer.
pub fn max_edge_count(nodes_per_layer: &[usize]) -> usize {
    nodes_per_layer.windows(2).map(|w| w[0] * w[1]).sum()
}
