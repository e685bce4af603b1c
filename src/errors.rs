// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagSynthError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The three curve control points collapse onto each other.
    #[error("singular system while fitting node-count curve (max_layer = {max_layer})")]
    SingularSystem { max_layer: i64 },

    #[error("DAG count exceeds the shard tree capacity of {0}")]
    ShardLimitExceeded(usize),

    /// A generated graph broke a structural invariant. Always a bug.
    #[error("Graph invariant violated: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("protobuf decode error: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagSynthError>;
