// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every override flag is optional; when given it replaces the matching
//! field of the TOML config before validation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::batch::BatchOptions;
use crate::config::{GenerateSection, ReplaySection};
use crate::types::{FinishAction, OutputKind, SpecialMode};

/// Command-line arguments for `dagsynth`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagsynth",
    version,
    about = "Generate random layered workflow DAGs and replay them against workflow engines.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = "Dagsynth.toml", global = true)]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGSYNTH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a batch of DAGs under `<DEST>/dag`.
    Generate(GenerateArgs),
    /// Replay a generated batch into the configured targets.
    Replay(ReplayArgs),
    /// Build one DAG and send it as a customized/plain twin pair.
    Pair(PairArgs),
}

/// Overrides for the `[generate]` section.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateOverrides {
    /// Number of DAGs.
    #[arg(long)]
    pub count: Option<usize>,

    /// Widest layer the node-count curve aims for.
    #[arg(long)]
    pub layer_node: Option<u32>,

    #[arg(long, allow_negative_numbers = true)]
    pub max_layer: Option<i64>,

    /// Skip-edge attempts per DAG.
    #[arg(long)]
    pub skip_layer: Option<usize>,

    #[arg(long, value_name = "BOOL")]
    pub density: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub single_in: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub single_out: Option<bool>,

    /// Container image written into every task.
    #[arg(long)]
    pub image: Option<String>,

    /// Comma-separated output kinds, e.g. `json,protobuf`.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub outputs: Option<Vec<OutputKind>>,

    /// Task duration range in seconds, `MIN,MAX`.
    #[arg(long, value_name = "MIN,MAX", value_parser = parse_duration_range)]
    pub duration_range: Option<[u64; 2]>,

    /// Also write `<i>.dot` next to each DAG.
    #[arg(long, value_name = "BOOL")]
    pub enable_graph: Option<bool>,

    #[arg(long)]
    pub custom_wf_rate: Option<f64>,

    #[arg(long)]
    pub task_cpu: Option<u32>,

    /// MiB.
    #[arg(long)]
    pub task_mem: Option<u64>,

    /// RNG seed for a reproducible batch.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateOverrides {
    pub fn apply(&self, g: &mut GenerateSection) {
        set(&mut g.count, self.count);
        set(&mut g.layer_node, self.layer_node);
        set(&mut g.max_layer, self.max_layer);
        set(&mut g.skip_layer, self.skip_layer);
        set(&mut g.density, self.density);
        set(&mut g.single_in, self.single_in);
        set(&mut g.single_out, self.single_out);
        set(&mut g.image, self.image.clone());
        set(&mut g.outputs, self.outputs.clone());
        set(&mut g.duration_range, self.duration_range);
        set(&mut g.enable_graph, self.enable_graph);
        set(&mut g.custom_wf_rate, self.custom_wf_rate);
        set(&mut g.task_cpu, self.task_cpu);
        set(&mut g.task_mem, self.task_mem);
        if self.seed.is_some() {
            g.seed = self.seed;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Destination directory; DAGs land in `<DEST>/dag`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dest: PathBuf,

    /// Regenerate even if `workflows.lock` exists.
    #[arg(long)]
    pub force: bool,

    /// Check every DAG's structural invariants before writing it.
    #[arg(long)]
    pub verify: bool,

    #[command(flatten)]
    pub overrides: GenerateOverrides,
}

impl GenerateArgs {
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            dest: self.dest.clone(),
            force: self.force,
            verify: self.verify,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Directory holding the generated `dag` directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dest: PathBuf,

    /// Generate the batch first (a no-op if it is already locked).
    #[arg(long)]
    pub generate: bool,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause after each batch, seconds.
    #[arg(long)]
    pub sleep_secs: Option<f64>,

    #[arg(long)]
    pub rounds: Option<usize>,

    #[arg(long, value_name = "BOOL")]
    pub to_scheduler: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub to_argo: Option<bool>,

    #[arg(long)]
    pub scheduler_time_factor: Option<f64>,

    #[arg(long)]
    pub scheduler_time_factor_end: Option<f64>,

    #[arg(long)]
    pub argo_time_factor: Option<f64>,

    /// CSV file receiving latency rows.
    #[arg(long, value_name = "PATH")]
    pub metrics_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub action_on_finish: Option<FinishAction>,

    /// Run the twin-pair mode instead of the batch loop.
    #[arg(long, value_enum)]
    pub special: Option<SpecialMode>,

    /// Spool submitted workflows here instead of discarding them.
    #[arg(long, value_name = "DIR")]
    pub outbox: Option<PathBuf>,

    #[arg(long)]
    pub argo_image: Option<String>,

    // `--seed` also seeds the replay sampling.
    #[command(flatten)]
    pub generate_overrides: GenerateOverrides,
}

impl ReplayArgs {
    pub fn apply(&self, r: &mut ReplaySection) {
        set(&mut r.batch_size, self.batch_size);
        set(&mut r.sleep_secs, self.sleep_secs);
        set(&mut r.rounds, self.rounds);
        set(&mut r.to_scheduler, self.to_scheduler);
        set(&mut r.to_argo, self.to_argo);
        set(&mut r.scheduler_time_factor, self.scheduler_time_factor);
        set(&mut r.scheduler_time_factor_end, self.scheduler_time_factor_end);
        set(&mut r.argo_time_factor, self.argo_time_factor);
        set(&mut r.action_on_finish, self.action_on_finish);
        set(&mut r.special, self.special);
        set(&mut r.argo_image, self.argo_image.clone());
        if self.metrics_file.is_some() {
            r.metrics_file = self.metrics_file.clone();
        }
        if self.outbox.is_some() {
            r.outbox = self.outbox.clone();
        }
        if self.generate_overrides.seed.is_some() {
            r.seed = self.generate_overrides.seed;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PairArgs {
    /// Which grade the customized twin prioritises.
    #[arg(long, value_enum)]
    pub special: SpecialMode,

    /// Gap between the customized and the plain twin, seconds.
    #[arg(long)]
    pub wait_secs: Option<f64>,

    #[arg(long, value_name = "DIR")]
    pub outbox: Option<PathBuf>,

    #[command(flatten)]
    pub generate_overrides: GenerateOverrides,
}

impl PairArgs {
    pub fn apply(&self, r: &mut ReplaySection) {
        r.special = self.special;
        set(&mut r.special_wait_secs, self.wait_secs);
        if self.outbox.is_some() {
            r.outbox = self.outbox.clone();
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn parse_duration_range(s: &str) -> Result<[u64; 2], String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid duration {v:?}: {e}"))
    };
    Ok([parse(lo)?, parse(hi)?])
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
