// src/replay/runner.rs

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use super::loader::StagedWorkflows;
use super::metrics::{LatencyRow, MetricsRecorder};
use super::sink::{Target, WorkflowSink};
use crate::config::ReplaySection;
use crate::errors::{DagSynthError, Result};
use crate::fs::FileSystem;
use crate::workflow::argo::json_to_argo_yaml;

/// What a replay run sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub rows: Vec<LatencyRow>,
    /// Workflows submitted per target.
    pub submitted: BTreeMap<Target, usize>,
}

/// Drive `cfg.rounds` rounds of batched submissions into `sink`.
///
/// Each round samples `batch_size` workflows with replacement for every
/// enabled target, times the submission and records the average latency per
/// workflow (plus the configured time factor) before sleeping `sleep_secs`.
pub async fn replay<S, F, R>(
    cfg: &ReplaySection,
    staged: &StagedWorkflows,
    sink: &mut S,
    metrics: &mut MetricsRecorder<F>,
    rng: &mut R,
) -> Result<ReplayReport>
where
    S: WorkflowSink + ?Sized,
    F: FileSystem,
    R: Rng + Send + ?Sized,
{
    check_inputs(cfg, staged)?;

    let mut report = ReplayReport::default();
    let pause = Duration::from_secs_f64(cfg.sleep_secs);

    for batch_idx in 0..cfg.rounds {
        if cfg.to_scheduler {
            let index = report.submitted.get(&Target::Scheduler).copied().unwrap_or(0);
            let elapsed_ns = send_scheduler_batch(cfg, staged, sink, rng).await?;
            finish_batch(&mut report, metrics, Target::Scheduler, index, batch_idx, elapsed_ns, cfg.batch_size)?;
            tokio::time::sleep(pause).await;
        }
        if cfg.to_argo {
            let index = report.submitted.get(&Target::Argo).copied().unwrap_or(0);
            let elapsed_ns = send_argo_batch(cfg, staged, sink, rng).await?;
            finish_batch(&mut report, metrics, Target::Argo, index, batch_idx, elapsed_ns, cfg.batch_size)?;
            tokio::time::sleep(pause).await;
        }
    }

    info!(rounds = cfg.rounds, submitted = ?report.submitted, "replay finished");
    Ok(report)
}

fn check_inputs(cfg: &ReplaySection, staged: &StagedWorkflows) -> Result<()> {
    if !cfg.to_scheduler && !cfg.to_argo {
        return Err(DagSynthError::InvalidParameter(
            "replay needs at least one target (to_scheduler or to_argo)".to_string(),
        ));
    }
    if cfg.to_scheduler && staged.protobuf.is_empty() {
        return Err(DagSynthError::InvalidParameter(
            "scheduler replay needs protobuf workflows; generate with outputs including \"protobuf\""
                .to_string(),
        ));
    }
    if cfg.to_argo && staged.json.is_empty() {
        return Err(DagSynthError::InvalidParameter(
            "argo replay needs json workflows; generate with outputs including \"json\"".to_string(),
        ));
    }
    Ok(())
}

async fn send_scheduler_batch<S, R>(
    cfg: &ReplaySection,
    staged: &StagedWorkflows,
    sink: &mut S,
    rng: &mut R,
) -> Result<u64>
where
    S: WorkflowSink + ?Sized,
    R: Rng + Send + ?Sized,
{
    let pool = &staged.protobuf;
    let batch: Vec<Vec<u8>> = (0..cfg.batch_size)
        .map(|_| pool[rng.gen_range(0..pool.len())].clone())
        .collect();

    let started = Instant::now();
    sink.submit(Target::Scheduler, batch).await?;
    let elapsed = started.elapsed().as_nanos() as f64;

    let factor = if cfg.scheduler_time_factor_end != 0.0 {
        rng.gen_range(cfg.scheduler_time_factor..=cfg.scheduler_time_factor_end)
    } else {
        cfg.scheduler_time_factor
    };
    debug!(factor, "scheduler time factor");

    Ok(average_latency_ns(elapsed, cfg.batch_size, factor))
}

async fn send_argo_batch<S, R>(
    cfg: &ReplaySection,
    staged: &StagedWorkflows,
    sink: &mut S,
    rng: &mut R,
) -> Result<u64>
where
    S: WorkflowSink + ?Sized,
    R: Rng + Send + ?Sized,
{
    let pool = &staged.json;
    let picks: Vec<usize> = (0..cfg.batch_size)
        .map(|_| rng.gen_range(0..pool.len()))
        .collect();

    // Manifest conversion counts towards the latency, as it would for a
    // submitter shelling out per workflow.
    let mut total = 0f64;
    for pick in picks {
        let started = Instant::now();
        let manifest = json_to_argo_yaml(&pool[pick], &cfg.argo_image)?;
        sink.submit(Target::Argo, vec![manifest.into_bytes()]).await?;
        total += started.elapsed().as_nanos() as f64;
    }

    Ok(average_latency_ns(total, cfg.batch_size, cfg.argo_time_factor))
}

/// `ceil(elapsed / n + factor seconds)`, in nanoseconds.
pub fn average_latency_ns(elapsed_ns: f64, n: usize, factor_secs: f64) -> u64 {
    (elapsed_ns / n.max(1) as f64 + factor_secs * 1e9).ceil() as u64
}

fn finish_batch<F: FileSystem>(
    report: &mut ReplayReport,
    metrics: &mut MetricsRecorder<F>,
    target: Target,
    index: usize,
    batch_idx: usize,
    elapsed_ns: u64,
    sent: usize,
) -> Result<()> {
    let row = LatencyRow {
        target,
        index,
        batch_idx,
        elapsed_ns,
    };
    metrics.record(&row)?;
    report.rows.push(row);
    *report.submitted.entry(target).or_default() += sent;
    Ok(())
}
