#![allow(dead_code)]

use dagsynth::dag::{CurvePoints, DagBuilder, DagParams, NodeCountCurve};

/// Builder capped by the node-count curve, the way the batch runner sets it up.
pub fn curve_builder(params: DagParams, layer_node: u32) -> DagBuilder<NodeCountCurve> {
    let points = CurvePoints::from_layer_node(params.max_layer as i64, layer_node);
    let curve = NodeCountCurve::fit(points).expect("max_layer >= 1 never yields a singular system");
    DagBuilder::new(params, curve)
}
