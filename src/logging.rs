// src/logging.rs

//! Subscriber setup. `--log-level` wins outright; otherwise `DAGSYNTH_LOG`
//! is read as a filter directive (`debug`, `dagsynth::dag=trace,info`, ...),
//! falling back to `info`. Everything goes to stderr because the batch
//! summary is printed on stdout.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "DAGSYNTH_LOG";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::default().add_directive(LevelFilter::from_level(level.into()).into());
    }

    let directives = env.map(str::trim).filter(|s| !s.is_empty());
    match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        // Unparseable directives fall back to the default instead of
        // aborting startup.
        _ => EnvFilter::new("info"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_level(filter: EnvFilter) -> Option<LevelFilter> {
        filter.max_level_hint()
    }

    #[test]
    fn cli_flag_overrides_environment() {
        let filter = build_filter(Some(LogLevel::Trace), Some("error"));
        assert_eq!(max_level(filter), Some(LevelFilter::TRACE));
    }

    #[test]
    fn environment_directives_are_honoured() {
        let filter = build_filter(None, Some(" debug "));
        assert_eq!(max_level(filter), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn missing_or_bad_environment_means_info() {
        assert_eq!(max_level(build_filter(None, None)), Some(LevelFilter::INFO));
        assert_eq!(
            max_level(build_filter(None, Some("dagsynth=verbose"))),
            Some(LevelFilter::INFO)
        );
    }
}
