// src/replay/mod.rs

//! Replay of a generated batch against workflow targets.
//!
//! - `loader`: reads the staged workflows named in `files.txt`.
//! - `sink`: the `WorkflowSink` seam and the shipped sinks.
//! - `metrics`: CSV latency rows.
//! - `runner`: the round/batch/sleep loop.
//! - `special`: customized vs. plain twin submission.

pub mod loader;
pub mod metrics;
pub mod runner;
pub mod sink;
pub mod special;

pub use loader::{StagedWorkflows, load_staged};
pub use metrics::{LatencyRow, MetricsRecorder};
pub use runner::{ReplayReport, replay};
pub use sink::{NullSink, SpoolSink, Target, WorkflowSink};
pub use special::{TwinPair, build_pair, run_pair};
