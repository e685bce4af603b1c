// src/dag/mod.rs

//! Random DAG topology generation.
//!
//! - [`curve`] fits the quadratic node-count curve that caps layer widths.
//! - [`graph`] holds the layered graph and its adjacency maps.
//! - [`reach`] answers reachability questions without recursion.
//! - [`builder`] runs the layered generation and repair algorithm.
//! - [`stats`] summarises a generated graph.
//! - [`validate`] re-checks structural invariants with `petgraph`.

pub mod builder;
pub mod curve;
pub mod graph;
pub mod reach;
pub mod stats;
pub mod validate;

pub use builder::{DagBuilder, DagParams, GeneratedDag, MIN_LAYERS};
pub use curve::{CurvePoints, LayerCapacity, NodeCountCurve};
pub use graph::{Graph, NodeId, task_name};
pub use stats::GenerationStats;
