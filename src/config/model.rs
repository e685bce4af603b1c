// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::dag::{CurvePoints, DagParams};
use crate::types::{FinishAction, OutputKind, SpecialMode};
use crate::workflow::TaskTemplate;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [generate]
/// count = 1000
/// layer_node = 3
/// max_layer = 3
/// outputs = ["json", "protobuf"]
///
/// [replay]
/// batch_size = 100
/// rounds = 10
/// ```
///
/// Both sections are optional and every field has a default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub generate: GenerateSection,

    #[serde(default)]
    pub replay: ReplaySection,
}

/// Validated configuration. Built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub generate: GenerateSection,
    pub replay: ReplaySection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(generate: GenerateSection, replay: ReplaySection) -> Self {
        Self { generate, replay }
    }
}

/// `[generate]` section: shape of the DAGs and of the tasks in them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateSection {
    /// Number of DAGs to generate.
    pub count: usize,
    /// Widest layer the node-count curve aims for (at `max_layer`).
    pub layer_node: u32,
    pub max_layer: i64,
    /// Maximum number of skip-edge attempts per DAG.
    pub skip_layer: usize,
    pub density: bool,
    pub single_in: bool,
    pub single_out: bool,
    pub image: String,
    pub outputs: Vec<OutputKind>,
    /// Inclusive task duration range in seconds.
    pub duration_range: [u64; 2],
    /// Also write a `.dot` file per DAG.
    pub enable_graph: bool,
    /// Share of workflows tagged as customized, in `[0, 1]`.
    pub custom_wf_rate: f64,
    /// CPU load per task, percent.
    pub task_cpu: u32,
    /// Memory per task, MiB.
    pub task_mem: u64,
    /// Fixed RNG seed for reproducible batches.
    pub seed: Option<u64>,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            count: 5,
            layer_node: 10,
            max_layer: 100,
            skip_layer: 5,
            density: false,
            single_in: false,
            single_out: true,
            image: "liudy093/task:latest".to_string(),
            outputs: vec![OutputKind::Json],
            duration_range: [30, 600],
            enable_graph: false,
            custom_wf_rate: 0.0,
            task_cpu: 0,
            task_mem: 0,
            seed: None,
        }
    }
}

impl GenerateSection {
    /// Only meaningful once `max_layer >= 1` has been validated.
    pub fn dag_params(&self) -> DagParams {
        DagParams {
            max_layer: self.max_layer.max(1) as usize,
            skip_layer_budget: self.skip_layer,
            single_entry: self.single_in,
            single_exit: self.single_out,
            density: self.density,
        }
    }

    pub fn curve_points(&self) -> CurvePoints {
        CurvePoints::from_layer_node(self.max_layer, self.layer_node)
    }

    pub fn task_template(&self) -> TaskTemplate {
        TaskTemplate {
            image: self.image.clone(),
            duration_range: (self.duration_range[0], self.duration_range[1]),
            task_cpu: self.task_cpu,
            task_mem: self.task_mem,
        }
    }
}

/// `[replay]` section: how staged workflows are pushed at the targets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReplaySection {
    /// Workflows sent per round and target.
    pub batch_size: usize,
    /// Pause after each batch.
    pub sleep_secs: f64,
    pub rounds: usize,
    pub to_scheduler: bool,
    pub to_argo: bool,
    /// Seconds added to every scheduler latency sample.
    pub scheduler_time_factor: f64,
    /// If non-zero, the scheduler factor is drawn uniformly from
    /// `[scheduler_time_factor, scheduler_time_factor_end]`.
    pub scheduler_time_factor_end: f64,
    /// Seconds added to every Argo latency sample.
    pub argo_time_factor: f64,
    /// CSV file receiving one latency row per batch.
    pub metrics_file: Option<PathBuf>,
    pub action_on_finish: FinishAction,
    pub special: SpecialMode,
    /// Gap between the customized and the plain twin.
    pub special_wait_secs: f64,
    /// Directory the spool sink writes submitted workflows into.
    pub outbox: Option<PathBuf>,
    /// Container image used in generated Argo manifests.
    pub argo_image: String,
    pub seed: Option<u64>,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            sleep_secs: 1.0,
            rounds: 100,
            to_scheduler: true,
            to_argo: false,
            scheduler_time_factor: 0.0,
            scheduler_time_factor_end: 0.0,
            argo_time_factor: 0.0,
            metrics_file: None,
            action_on_finish: FinishAction::Exit,
            special: SpecialMode::No,
            special_wait_secs: 10.0,
            outbox: None,
            argo_image: "liudy093/task:latest".to_string(),
            seed: None,
        }
    }
}
