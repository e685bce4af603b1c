use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Serialized projection written for every generated workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// `<i>.json` workflow document.
    Json,
    /// `<i>.data` protobuf-encoded workflow.
    Protobuf,
}

impl OutputKind {
    /// Listing-file tag (`json:` / `protobuf:` prefix in `files.txt`).
    pub fn tag(self) -> &'static str {
        match self {
            OutputKind::Json => "json",
            OutputKind::Protobuf => "protobuf",
        }
    }

    /// File name for a workflow stem, e.g. `17` → `17.json`.
    pub fn file_name(self, stem: &str) -> String {
        match self {
            OutputKind::Json => format!("{stem}.json"),
            OutputKind::Protobuf => format!("{stem}.data"),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputKind::Json),
            "protobuf" => Ok(OutputKind::Protobuf),
            other => Err(format!(
                "unknown output kind: {other} (expected \"json\" or \"protobuf\")"
            )),
        }
    }
}

/// What the replay process does after its last round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FinishAction {
    Exit,
    /// Park until Ctrl-C so a container does not restart-loop.
    Sleep,
}

impl Default for FinishAction {
    fn default() -> Self {
        FinishAction::Exit
    }
}

/// Twin-workflow mode used to compare a customized workflow against an
/// otherwise identical plain one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpecialMode {
    No,
    /// Customized twin prioritises time: cost grade C, time grade A.
    Time,
    /// Customized twin prioritises cost: cost grade A, time grade C.
    Cost,
}

impl Default for SpecialMode {
    fn default() -> Self {
        SpecialMode::No
    }
}
