// src/batch/summary.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::dag::GenerationStats;

/// Aggregate statistics over a generated batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub count: usize,
    pub max_depth: usize,
    pub min_depth: usize,
    pub max_width: usize,
    pub max_nodes: usize,
    pub customized: usize,
    pub edge_densities: Vec<f64>,
    pub data_file_sizes: Vec<usize>,
}

/// Distribution of serialized workflow sizes, in bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeStats {
    pub max: usize,
    pub min: usize,
    pub std_dev: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent size; the smallest one on ties.
    pub mode: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: &GenerationStats, data_file_size: usize) {
        self.min_depth = if self.count == 0 {
            stats.layer_count
        } else {
            self.min_depth.min(stats.layer_count)
        };
        self.count += 1;
        self.max_depth = self.max_depth.max(stats.layer_count);
        self.max_width = self.max_width.max(stats.width());
        self.max_nodes = self.max_nodes.max(stats.node_count());
        if stats.customized {
            self.customized += 1;
        }
        self.edge_densities.push(stats.edge_density);
        self.data_file_sizes.push(data_file_size);
    }

    pub fn mean_edge_density(&self) -> f64 {
        if self.edge_densities.is_empty() {
            return 0.0;
        }
        self.edge_densities.iter().sum::<f64>() / self.edge_densities.len() as f64
    }

    pub fn size_stats(&self) -> Option<SizeStats> {
        let sizes = &self.data_file_sizes;
        let max = *sizes.iter().max()?;
        let min = *sizes.iter().min()?;

        let n = sizes.len() as f64;
        let mean = sizes.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = sizes
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        let mut sorted = sizes.clone();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
        } else {
            sorted[mid] as f64
        };

        let mut freq: BTreeMap<usize, usize> = BTreeMap::new();
        for &s in sizes {
            *freq.entry(s).or_default() += 1;
        }
        // BTreeMap iterates ascending, so the first maximum is the smallest size.
        let mode = freq
            .iter()
            .fold((min, 0usize), |best, (&size, &hits)| {
                if hits > best.1 { (size, hits) } else { best }
            })
            .0;

        Some(SizeStats {
            max,
            min,
            std_dev: variance.sqrt(),
            mean,
            median,
            mode,
        })
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========= batch summary =========")?;
        writeln!(f, "generated {} DAGs", self.count)?;
        writeln!(f, "  max depth:             {}", self.max_depth)?;
        writeln!(f, "  min depth:             {}", self.min_depth)?;
        writeln!(f, "  max width:             {}", self.max_width)?;
        writeln!(f, "  max nodes per DAG:     {}", self.max_nodes)?;
        writeln!(f, "  customized workflows:  {}", self.customized)?;
        writeln!(f, "  mean edge density:     {:.4}", self.mean_edge_density())?;
        if let Some(s) = self.size_stats() {
            writeln!(f, "data file sizes:")?;
            writeln!(f, "  max:     {} bytes", s.max)?;
            writeln!(f, "  min:     {} bytes", s.min)?;
            writeln!(f, "  std dev: {:.2} bytes", s.std_dev)?;
            writeln!(f, "  mean:    {:.2} bytes", s.mean)?;
            writeln!(f, "  median:  {} bytes", s.median)?;
            writeln!(f, "  mode:    {} bytes", s.mode)?;
        }
        Ok(())
    }
}
