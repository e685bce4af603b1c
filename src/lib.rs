// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod replay;
pub mod types;
pub mod workflow;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::batch::{BatchOptions, DAG_DIR, generate_batch};
use crate::cli::{CliArgs, Command};
use crate::config::{ConfigFile, load_or_default};
use crate::fs::RealFileSystem;
use crate::replay::{
    MetricsRecorder, NullSink, SpoolSink, WorkflowSink, build_pair, load_staged, replay, run_pair,
};
use crate::types::{FinishAction, SpecialMode};

/// High-level entry point used by `main.rs`.
///
/// Loads the optional config file, applies the subcommand's overrides,
/// validates, and dispatches.
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_or_default(&args.config)
        .with_context(|| format!("loading config {:?}", args.config))?;

    match args.command {
        Command::Generate(gen_args) => {
            gen_args.overrides.apply(&mut raw.generate);
            let cfg = ConfigFile::try_from(raw)?;
            run_generate(&cfg, gen_args.batch_options()).await
        }
        Command::Replay(replay_args) => {
            replay_args.generate_overrides.apply(&mut raw.generate);
            replay_args.apply(&mut raw.replay);
            let cfg = ConfigFile::try_from(raw)?;

            if cfg.replay.special != SpecialMode::No {
                return run_special(&cfg).await;
            }

            if replay_args.generate {
                let opts = BatchOptions {
                    dest: replay_args.dest.clone(),
                    force: false,
                    verify: false,
                };
                run_generate(&cfg, opts).await?;
            }
            run_replay(&cfg, &replay_args.dest).await
        }
        Command::Pair(pair_args) => {
            pair_args.generate_overrides.apply(&mut raw.generate);
            pair_args.apply(&mut raw.replay);
            let cfg = ConfigFile::try_from(raw)?;
            run_special(&cfg).await
        }
    }
}

async fn run_generate(cfg: &ConfigFile, opts: BatchOptions) -> Result<()> {
    let section = cfg.generate.clone();

    // Generation is CPU-bound; keep it off the async workers.
    let summary = tokio::task::spawn_blocking(move || {
        let mut rng = make_rng(section.seed);
        generate_batch(&RealFileSystem, &section, &opts, &mut rng)
    })
    .await
    .context("generation task panicked")??;

    if let Some(summary) = summary {
        print!("{summary}");
    }
    Ok(())
}

async fn run_replay(cfg: &ConfigFile, dest: &std::path::Path) -> Result<()> {
    let r = &cfg.replay;
    let staged = load_staged(&RealFileSystem, &dest.join(DAG_DIR))?;

    let mut sink = make_sink(r.outbox.as_deref());
    let mut metrics = MetricsRecorder::create(RealFileSystem, r.metrics_file.clone())?;
    let mut rng = make_rng(r.seed);

    let report = replay(r, &staged, &mut sink, &mut metrics, &mut rng).await?;
    info!(batches = report.rows.len(), "replay complete");

    finish(r.action_on_finish).await
}

async fn run_special(cfg: &ConfigFile) -> Result<()> {
    let mut rng = make_rng(cfg.generate.seed);
    let pair = build_pair(&cfg.generate, cfg.replay.special, &mut rng)?;

    let mut sink = make_sink(cfg.replay.outbox.as_deref());
    run_pair(&pair, cfg.replay.special_wait_secs, &mut sink).await?;

    finish(cfg.replay.action_on_finish).await
}

fn make_sink(outbox: Option<&std::path::Path>) -> Box<dyn WorkflowSink> {
    match outbox {
        Some(dir) => {
            info!(outbox = ?dir, "spooling submitted workflows");
            Box::new(SpoolSink::new(RealFileSystem, dir))
        }
        None => {
            warn!("no outbox configured; submitted workflows are discarded");
            Box::new(NullSink::default())
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

async fn finish(action: FinishAction) -> Result<()> {
    if action == FinishAction::Sleep {
        info!("finished; sleeping until Ctrl+C");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl+C")?;
    }
    Ok(())
}
