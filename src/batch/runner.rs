// src/batch/runner.rs

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::listing::{LISTING_FILE, ListingEntry};
use super::shard::{ensure_capacity, shard_for};
use super::summary::BatchSummary;
use crate::config::GenerateSection;
use crate::dag::validate::verify;
use crate::dag::{DagBuilder, NodeCountCurve};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::OutputKind;
use crate::workflow::{Customization, WorkflowDocument, dot, proto};

pub const DAG_DIR: &str = "dag";
pub const LOCK_FILE: &str = "workflows.lock";

/// Where and how a batch is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Parent of the `dag` directory.
    pub dest: PathBuf,
    /// Regenerate even if a previous batch left its lock file.
    pub force: bool,
    /// Re-check every graph's invariants before writing it.
    pub verify: bool,
}

impl BatchOptions {
    pub fn dag_dir(&self) -> PathBuf {
        self.dest.join(DAG_DIR)
    }
}

/// Per-DAG `<i>.config.json`.
#[derive(Debug, Clone, Serialize)]
struct DagRecord {
    layer_count: usize,
    node_count: usize,
    data_file_size: usize,
}

/// Generate `cfg.count` DAGs into `<dest>/dag`.
///
/// Returns `None` without touching anything if a previous batch is locked
/// and `force` is not set.
pub fn generate_batch<F, R>(
    fs: &F,
    cfg: &GenerateSection,
    opts: &BatchOptions,
    rng: &mut R,
) -> Result<Option<BatchSummary>>
where
    F: FileSystem + ?Sized,
    R: Rng + ?Sized,
{
    let dag_dir = opts.dag_dir();
    let lock_path = dag_dir.join(LOCK_FILE);
    if fs.exists(&lock_path) && !opts.force {
        info!(?lock_path, "workflows already generated; skipping (use --force to regenerate)");
        return Ok(None);
    }

    ensure_capacity(cfg.count)?;

    let curve = NodeCountCurve::fit(cfg.curve_points())?;
    debug!(coefficients = ?curve.coefficients(), "fitted node-count curve");
    let builder = DagBuilder::new(cfg.dag_params(), curve);
    let template = cfg.task_template();
    // Only the binary form carries customization tags.
    let tags_carried = cfg.outputs.contains(&OutputKind::Protobuf);

    fs.create_dir_all(&dag_dir)?;
    let listing_path = dag_dir.join(LISTING_FILE);
    fs.write(&listing_path, b"")?;

    let mut summary = BatchSummary::new();
    info!(count = cfg.count, dest = ?dag_dir, "generating DAG batch");

    for index in 0..cfg.count {
        let rel_dir = shard_for(index)?.relative_dir();
        let stem = index.to_string();

        let mut dag = builder.build(rng);
        if opts.verify {
            verify(&dag.graph, builder.params())?;
        }

        let customization = if tags_carried {
            Customization::sample(rng, cfg.custom_wf_rate)
        } else {
            Customization::plain()
        };
        dag.stats.customized = customization.customized;
        let doc = WorkflowDocument::from_graph(&dag.graph, &template, rng);

        let written = write_outputs(
            fs,
            &dag_dir,
            &rel_dir,
            &stem,
            &cfg.outputs,
            &doc,
            &customization,
        )?;

        if cfg.enable_graph {
            let path = dag_dir.join(&rel_dir).join(format!("{stem}.dot"));
            fs.write(&path, dot::to_dot(&dag.graph).as_bytes())?;
        }

        let record = DagRecord {
            layer_count: dag.stats.layer_count,
            node_count: dag.stats.node_count(),
            data_file_size: written.data_file_size,
        };
        let record_path = dag_dir.join(&rel_dir).join(format!("{stem}.config.json"));
        fs.write(&record_path, serde_json::to_string(&record)?.as_bytes())?;

        let lines: String = written.entries.iter().map(ListingEntry::to_line).collect();
        fs.append(&listing_path, lines.as_bytes())?;

        summary.record(&dag.stats, written.data_file_size);

        if (index + 1) % 1000 == 0 {
            info!(done = index + 1, total = cfg.count, "generation progress");
        }
    }

    fs.write(&lock_path, b"gen locked")?;
    info!(count = summary.count, customized = summary.customized, "batch complete");

    Ok(Some(summary))
}

struct Written {
    entries: Vec<ListingEntry>,
    /// Size of the last payload written; the binary form wins when both
    /// outputs are enabled.
    data_file_size: usize,
}

fn write_outputs<F: FileSystem + ?Sized>(
    fs: &F,
    dag_dir: &Path,
    rel_dir: &Path,
    stem: &str,
    outputs: &[OutputKind],
    doc: &WorkflowDocument,
    customization: &Customization,
) -> Result<Written> {
    let mut written = Written {
        entries: Vec::with_capacity(outputs.len()),
        data_file_size: 0,
    };

    for &kind in ordered(outputs).iter() {
        let bytes = match kind {
            OutputKind::Json => doc.to_json()?.into_bytes(),
            OutputKind::Protobuf => proto::encode(doc, customization),
        };
        let rel_path = rel_dir.join(kind.file_name(stem));
        fs.write(&dag_dir.join(&rel_path), &bytes)?;

        written.data_file_size = bytes.len();
        written.entries.push(ListingEntry {
            kind,
            path: rel_path,
        });
    }

    Ok(written)
}

/// Deduplicated, JSON first.
fn ordered(outputs: &[OutputKind]) -> Vec<OutputKind> {
    [OutputKind::Json, OutputKind::Protobuf]
        .into_iter()
        .filter(|k| outputs.contains(k))
        .collect()
}
