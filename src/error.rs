//! Error taxonomy for network construction, training and I/O
//!
//! Errors fall into two families:
//!
//! - [`ConfigError`]: the caller asked for something inconsistent (bad topology,
//!   wrong vector lengths, out-of-range hyperparameters).
//! - [`ResourceError`]: an external artifact (weights file, parameter stream,
//!   bitmap) is missing, short or malformed.
//!
//! Numerical non-convergence is not an error; see [`crate::trainer::TrainingOutcome`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Top-level error returned by every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}

impl NetworkError {
    /// True when the caller supplied an inconsistent configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, NetworkError::Config(_))
    }

    /// True when an external artifact could not be read or decoded.
    pub fn is_resource(&self) -> bool {
        matches!(self, NetworkError::Resource(_))
    }
}

/// Inconsistent topology, vector lengths or hyperparameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("example {example}: input vector has {actual} values, expected {expected}")]
    InputLength {
        example: usize,
        expected: usize,
        actual: usize,
    },

    #[error("example {example}: expected-output vector has {actual} values, expected {expected}")]
    OutputLength {
        example: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hyperparameter '{name}': {reason}")]
    InvalidHyperParameter { name: &'static str, reason: String },

    #[error("example set is empty")]
    EmptyExampleSet,

    #[error("invalid configuration file: {0}")]
    InvalidConfigFile(String),
}

/// Missing, short or malformed external artifact.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{what} is truncated: expected {expected} values, found {found}")]
    Truncated {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("could not parse {what} from token {index} ('{token}')")]
    Parse {
        what: String,
        index: usize,
        token: String,
    },

    #[error("unsupported bitmap: {0}")]
    UnsupportedBitmap(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResourceError {
    /// Wrap an I/O failure together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ResourceError::Io {
            path: path.into(),
            source,
        }
    }
}
