// src/batch/listing.rs

//! `files.txt`: one `<kind>:<relative path>` line per staged workflow file.

use std::path::{Path, PathBuf};

use crate::errors::{DagSynthError, Result};
use crate::types::OutputKind;

pub const LISTING_FILE: &str = "files.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub kind: OutputKind,
    /// Relative to the `dag` directory.
    pub path: PathBuf,
}

impl ListingEntry {
    pub fn to_line(&self) -> String {
        // Listing paths always use `/`, whatever the host separator.
        let rel = self
            .path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}:{}\n", self.kind.tag(), rel)
    }
}

pub fn parse_listing(contents: &str) -> Result<Vec<ListingEntry>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line).map_err(|msg| {
            DagSynthError::ConfigError(format!("{LISTING_FILE} line {}: {msg}", idx + 1))
        }))
        .collect()
}

fn parse_line(line: &str) -> std::result::Result<ListingEntry, String> {
    let (kind, path) = line
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("expected `<kind>:<path>`, got {line:?}"))?;
    let kind: OutputKind = kind.parse()?;
    if path.is_empty() {
        return Err("empty path".to_string());
    }
    Ok(ListingEntry {
        kind,
        path: Path::new(path).to_path_buf(),
    })
}
