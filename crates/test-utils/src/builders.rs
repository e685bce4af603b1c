#![allow(dead_code)]

use std::path::PathBuf;

use dagsynth::config::{ConfigFile, GenerateSection, RawConfigFile, ReplaySection};
use dagsynth::types::{OutputKind, SpecialMode};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the defaults, with replay sleeping 0 seconds so tests do not
/// stall.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.replay.sleep_secs = 0.0;
        config.replay.special_wait_secs = 0.0;
        Self { config }
    }

    pub fn generate(mut self, section: GenerateSection) -> Self {
        self.config.generate = section;
        self
    }

    pub fn replay(mut self, section: ReplaySection) -> Self {
        self.config.replay = section;
        self
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.config.replay.batch_size = n;
        self
    }

    pub fn rounds(mut self, n: usize) -> Self {
        self.config.replay.rounds = n;
        self
    }

    pub fn targets(mut self, scheduler: bool, argo: bool) -> Self {
        self.config.replay.to_scheduler = scheduler;
        self.config.replay.to_argo = argo;
        self
    }

    pub fn scheduler_time_factor(mut self, start: f64, end: f64) -> Self {
        self.config.replay.scheduler_time_factor = start;
        self.config.replay.scheduler_time_factor_end = end;
        self
    }

    pub fn metrics_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.replay.metrics_file = Some(path.into());
        self
    }

    pub fn special(mut self, mode: SpecialMode) -> Self {
        self.config.replay.special = mode;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `GenerateSection`.
pub struct GenerateSectionBuilder {
    section: GenerateSection,
}

impl GenerateSectionBuilder {
    /// Small, fast DAGs: `count` DAGs of depth in `[3, 4]`.
    pub fn small(count: usize) -> Self {
        Self {
            section: GenerateSection {
                count,
                layer_node: 3,
                max_layer: 4,
                skip_layer: 0,
                ..GenerateSection::default()
            },
        }
    }

    pub fn layer_node(mut self, n: u32) -> Self {
        self.section.layer_node = n;
        self
    }

    pub fn max_layer(mut self, n: i64) -> Self {
        self.section.max_layer = n;
        self
    }

    pub fn skip_layer(mut self, n: usize) -> Self {
        self.section.skip_layer = n;
        self
    }

    pub fn density(mut self, val: bool) -> Self {
        self.section.density = val;
        self
    }

    pub fn single_in(mut self, val: bool) -> Self {
        self.section.single_in = val;
        self
    }

    pub fn single_out(mut self, val: bool) -> Self {
        self.section.single_out = val;
        self
    }

    pub fn outputs(mut self, kinds: &[OutputKind]) -> Self {
        self.section.outputs = kinds.to_vec();
        self
    }

    pub fn enable_graph(mut self, val: bool) -> Self {
        self.section.enable_graph = val;
        self
    }

    pub fn custom_wf_rate(mut self, rate: f64) -> Self {
        self.section.custom_wf_rate = rate;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.section.seed = Some(seed);
        self
    }

    pub fn build(self) -> GenerateSection {
        self.section
    }
}
