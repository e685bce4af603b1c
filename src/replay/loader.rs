// src/replay/loader.rs

use std::path::Path;

use tracing::info;

use crate::batch::{LISTING_FILE, parse_listing};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::OutputKind;

/// Workflows read back from a generated batch, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedWorkflows {
    pub json: Vec<String>,
    pub protobuf: Vec<Vec<u8>>,
}

impl StagedWorkflows {
    pub fn is_empty(&self) -> bool {
        self.json.is_empty() && self.protobuf.is_empty()
    }
}

/// Read every file named in `<dag_dir>/files.txt`.
pub fn load_staged<F: FileSystem + ?Sized>(fs: &F, dag_dir: &Path) -> Result<StagedWorkflows> {
    let listing = fs.read_to_string(&dag_dir.join(LISTING_FILE))?;
    let mut staged = StagedWorkflows::default();

    for entry in parse_listing(&listing)? {
        let path = dag_dir.join(&entry.path);
        match entry.kind {
            OutputKind::Json => staged.json.push(fs.read_to_string(&path)?),
            OutputKind::Protobuf => staged.protobuf.push(fs.read(&path)?),
        }
    }

    info!(
        json = staged.json.len(),
        protobuf = staged.protobuf.len(),
        ?dag_dir,
        "loaded staged workflows"
    );
    Ok(staged)
}
