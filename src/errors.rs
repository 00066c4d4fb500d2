use thiserror::Error;

use crate::models::Joint;

/// A frame that cannot be measured: a joint is absent or the geometry is degenerate.
///
/// Sub-scorers catch this locally and degrade to a zero sub-score, so it never
/// aborts a sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("missing joint: {0}")]
    MissingJoint(Joint),
    #[error("degenerate vector at {0}")]
    DegenerateVector(&'static str),
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Invalid or missing scoring configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid range for {name}: ({min}, {max})")]
    InvalidRange { name: String, min: f64, max: f64 },
    #[error("invalid weights for {0}")]
    InvalidWeights(String),
    #[error("invalid thresholds for {0}")]
    InvalidThresholds(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
