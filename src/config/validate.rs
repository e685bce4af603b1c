// src/config/validate.rs

use crate::config::model::{ConfigFile, GenerateSection, RawConfigFile, ReplaySection};
use crate::errors::{DagSynthError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DagSynthError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.generate, raw.replay))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_generate(&cfg.generate)?;
    validate_replay(&cfg.replay)?;
    Ok(())
}

/// Upper bound on `[generate].task_mem` (1 TiB), keeping the doubled byte
/// count of a task's memory range within `u64`.
pub const MAX_TASK_MEM_MIB: u64 = 1 << 20;

fn config_error(msg: impl Into<String>) -> DagSynthError {
    DagSynthError::ConfigError(msg.into())
}

fn validate_generate(g: &GenerateSection) -> Result<()> {
    if g.count == 0 {
        return Err(config_error("[generate].count must be >= 1 (got 0)"));
    }

    // The node-count curve is singular for max_layer <= 0.
    if g.max_layer < 1 {
        return Err(config_error(format!(
            "[generate].max_layer must be >= 1 (got {})",
            g.max_layer
        )));
    }

    if g.layer_node == 0 {
        return Err(config_error("[generate].layer_node must be >= 1 (got 0)"));
    }

    let [lo, hi] = g.duration_range;
    if lo > hi {
        return Err(config_error(format!(
            "[generate].duration_range must be [min, max] with min <= max (got [{lo}, {hi}])"
        )));
    }

    if !(0.0..=1.0).contains(&g.custom_wf_rate) {
        return Err(config_error(format!(
            "[generate].custom_wf_rate must be within [0, 1] (got {})",
            g.custom_wf_rate
        )));
    }

    if g.task_cpu > 100 {
        return Err(config_error(format!(
            "[generate].task_cpu is a percentage in [0, 100] (got {})",
            g.task_cpu
        )));
    }

    if g.task_mem > MAX_TASK_MEM_MIB {
        return Err(config_error(format!(
            "[generate].task_mem must be <= {MAX_TASK_MEM_MIB} MiB (got {})",
            g.task_mem
        )));
    }

    if g.outputs.is_empty() {
        return Err(config_error("[generate].outputs must name at least one output kind"));
    }

    if g.image.trim().is_empty() {
        return Err(config_error("[generate].image must not be empty"));
    }

    Ok(())
}

fn validate_replay(r: &ReplaySection) -> Result<()> {
    if r.batch_size == 0 {
        return Err(config_error("[replay].batch_size must be >= 1 (got 0)"));
    }

    for (name, value) in [
        ("sleep_secs", r.sleep_secs),
        ("scheduler_time_factor", r.scheduler_time_factor),
        ("scheduler_time_factor_end", r.scheduler_time_factor_end),
        ("argo_time_factor", r.argo_time_factor),
        ("special_wait_secs", r.special_wait_secs),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(config_error(format!(
                "[replay].{name} must be a non-negative number (got {value})"
            )));
        }
    }

    if r.scheduler_time_factor_end != 0.0 && r.scheduler_time_factor_end < r.scheduler_time_factor
    {
        return Err(config_error(format!(
            "[replay].scheduler_time_factor_end ({}) must be 0 or >= scheduler_time_factor ({})",
            r.scheduler_time_factor_end, r.scheduler_time_factor
        )));
    }

    Ok(())
}
