// src/replay/metrics.rs

use std::path::PathBuf;

use tracing::info;

use super::sink::Target;
use crate::errors::Result;
use crate::fs::FileSystem;

pub const CSV_HEADER: &str = "type,index,batch_idx,elapsed_time\n";

/// One latency sample: average nanoseconds per workflow for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRow {
    pub target: Target,
    /// Workflows already sent to this target before the batch.
    pub index: usize,
    /// Round number.
    pub batch_idx: usize,
    pub elapsed_ns: u64,
}

impl LatencyRow {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{}\n",
            self.target.label(),
            self.index,
            self.batch_idx,
            self.elapsed_ns
        )
    }
}

/// Appends latency rows to a CSV file, flushing each row.
///
/// Without a path rows are only logged.
#[derive(Debug)]
pub struct MetricsRecorder<F> {
    fs: F,
    path: Option<PathBuf>,
}

impl<F: FileSystem> MetricsRecorder<F> {
    /// Truncate `path` and write the CSV header.
    pub fn create(fs: F, path: Option<PathBuf>) -> Result<Self> {
        if let Some(p) = &path {
            info!(path = ?p, "writing latency metrics");
            fs.write(p, CSV_HEADER.as_bytes())?;
        }
        Ok(Self { fs, path })
    }

    pub fn record(&mut self, row: &LatencyRow) -> Result<()> {
        let line = row.to_csv_line();
        info!(metric = line.trim_end(), "batch latency");
        if let Some(p) = &self.path {
            self.fs.append(p, line.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::Path;

    #[test]
    fn header_then_rows() {
        let fs = MockFileSystem::new();
        let mut rec = MetricsRecorder::create(fs.clone(), Some("/m.csv".into())).unwrap();
        rec.record(&LatencyRow {
            target: Target::Scheduler,
            index: 0,
            batch_idx: 0,
            elapsed_ns: 1200,
        })
        .unwrap();
        rec.record(&LatencyRow {
            target: Target::Argo,
            index: 10,
            batch_idx: 1,
            elapsed_ns: 7,
        })
        .unwrap();

        assert_eq!(
            fs.read_to_string(Path::new("/m.csv")).unwrap(),
            "type,index,batch_idx,elapsed_time\ncore,0,0,1200\nargo,10,1,7\n"
        );
    }

    #[test]
    fn pathless_recorder_writes_nothing() {
        let fs = MockFileSystem::new();
        let mut rec = MetricsRecorder::create(fs.clone(), None).unwrap();
        rec.record(&LatencyRow {
            target: Target::Scheduler,
            index: 0,
            batch_idx: 0,
            elapsed_ns: 1,
        })
        .unwrap();
        assert!(fs.files().is_empty());
    }
}
