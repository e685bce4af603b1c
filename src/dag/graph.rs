// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graphmap::DiGraphMap;

/// Node identifiers are assigned contiguously from 0 across the whole graph.
pub type NodeId = u32;

static EMPTY: BTreeSet<NodeId> = BTreeSet::new();

/// Layered DAG produced by one generation run.
///
/// Layers are ordered; edges are only ever inserted through [`Graph::add_edge`],
/// which keeps the forward and backward maps and the edge counter in sync.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    layers: Vec<Vec<NodeId>>,
    /// Layer index of each node, indexed by node id.
    layer_of: Vec<usize>,
    forward: BTreeMap<NodeId, BTreeSet<NodeId>>,
    backward: BTreeMap<NodeId, BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer of `size` fresh nodes and return their ids in
    /// ascending order.
    pub fn push_layer(&mut self, size: usize) -> Vec<NodeId> {
        let layer_index = self.layers.len();
        let first = self.layer_of.len() as NodeId;
        let ids: Vec<NodeId> = (first..first + size as NodeId).collect();
        self.layer_of.extend(std::iter::repeat(layer_index).take(size));
        self.layers.push(ids.clone());
        ids
    }

    /// Reorder the nodes of one layer. `order` must be a permutation of the
    /// layer's current contents.
    pub(crate) fn reorder_layer(&mut self, layer: usize, order: Vec<NodeId>) {
        debug_assert_eq!(
            order.iter().collect::<BTreeSet<_>>(),
            self.layers[layer].iter().collect::<BTreeSet<_>>()
        );
        self.layers[layer] = order;
    }

    /// Insert `src -> dst`. Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) -> bool {
        debug_assert!(
            self.layer_index(src) < self.layer_index(dst),
            "edge t{src} -> t{dst} does not go strictly forward"
        );

        if !self.forward.entry(src).or_default().insert(dst) {
            return false;
        }
        self.backward.entry(dst).or_default().insert(src);
        self.edge_count += 1;
        true
    }

    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> &[NodeId] {
        &self.layers[index]
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node_count(&self) -> usize {
        self.layer_of.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }

    /// All node ids, layer by layer.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.layers.iter().flatten().copied()
    }

    /// All edges as `(src, dst)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.forward
            .iter()
            .flat_map(|(&src, dsts)| dsts.iter().map(move |&dst| (src, dst)))
    }

    pub fn layer_index(&self, node: NodeId) -> Option<usize> {
        self.layer_of.get(node as usize).copied()
    }

    /// `(layer, position within layer)` of a node.
    pub fn position_of(&self, node: NodeId) -> Option<(usize, usize)> {
        let layer = self.layer_index(node)?;
        let pos = self.layers[layer].iter().position(|&n| n == node)?;
        Some((layer, pos))
    }

    pub fn successors(&self, node: NodeId) -> &BTreeSet<NodeId> {
        self.forward.get(&node).unwrap_or(&EMPTY)
    }

    pub fn predecessors(&self, node: NodeId) -> &BTreeSet<NodeId> {
        self.backward.get(&node).unwrap_or(&EMPTY)
    }

    pub fn forward_edges(&self) -> &BTreeMap<NodeId, BTreeSet<NodeId>> {
        &self.forward
    }

    pub fn backward_edges(&self) -> &BTreeMap<NodeId, BTreeSet<NodeId>> {
        &self.backward
    }

    pub fn has_predecessor(&self, node: NodeId) -> bool {
        !self.predecessors(node).is_empty()
    }

    pub fn has_successor(&self, node: NodeId) -> bool {
        !self.successors(node).is_empty()
    }

    /// Dependencies of a node as task names (`t<id>`).
    pub fn dependencies_of(&self, node: NodeId) -> Vec<String> {
        self.predecessors(node).iter().map(|&p| task_name(p)).collect()
    }

    /// Petgraph view used for validation and DOT export.
    pub fn to_graphmap(&self) -> DiGraphMap<NodeId, ()> {
        let mut g = DiGraphMap::with_capacity(self.node_count(), self.edge_count);
        for node in self.nodes() {
            g.add_node(node);
        }
        for (src, dst) in self.edges() {
            g.add_edge(src, dst, ());
        }
        g
    }
}

/// Human-readable task name for a node id.
pub fn task_name(node: NodeId) -> String {
    format!("t{node}")
}
