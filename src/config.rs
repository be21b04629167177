//! Configuration structures for training
//!
//! [`HyperParameters`] is the immutable bundle handed to a
//! [`Trainer`](crate::trainer::Trainer). [`TrainingConfig`] adds the topology
//! and an optional seed so that a whole run can be described in one JSON file.

use crate::error::{ConfigError, ResourceError, Result};
use crate::topology::Topology;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Learning rate, weight-initialization bounds and stopping criteria.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HyperParameters {
    /// Step size applied to every weight update (must be positive)
    pub learning_rate: f64,

    /// Lower bound for randomized initial weights
    pub min_weight: f64,

    /// Upper bound for randomized initial weights
    pub max_weight: f64,

    /// Training stops once the average error drops to this value or below
    pub error_threshold: f64,

    /// Training stops after this many full sweeps over the examples
    pub max_iterations: usize,
}

impl HyperParameters {
    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHyperParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(invalid(
                "learning_rate",
                format!("must be a positive number, got {}", self.learning_rate),
            ));
        }

        if !self.min_weight.is_finite() || !self.max_weight.is_finite() {
            return Err(invalid(
                "min_weight/max_weight",
                "weight bounds must be finite".to_string(),
            ));
        }

        if self.min_weight > self.max_weight {
            return Err(invalid(
                "min_weight/max_weight",
                format!(
                    "min_weight ({}) exceeds max_weight ({})",
                    self.min_weight, self.max_weight
                ),
            ));
        }

        if !self.error_threshold.is_finite() || self.error_threshold < 0.0 {
            return Err(invalid(
                "error_threshold",
                format!("must be non-negative, got {}", self.error_threshold),
            ));
        }

        if self.max_iterations == 0 {
            return Err(invalid(
                "max_iterations",
                "must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for HyperParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error threshold = {}", self.error_threshold)?;
        writeln!(f, "max iterations = {}", self.max_iterations)?;
        writeln!(f, "min weight value = {}", self.min_weight)?;
        writeln!(f, "max weight value = {}", self.max_weight)?;
        writeln!(f, "learning factor = {}", self.learning_rate)
    }
}

fn invalid(name: &'static str, reason: String) -> crate::error::NetworkError {
    ConfigError::InvalidHyperParameter { name, reason }.into()
}

/// Complete description of a training run.
///
/// # Example
///
/// ```json
/// {
///   "input_size": 2,
///   "hidden_layers": [2],
///   "output_size": 1,
///   "seed": 1,
///   "hyperparameters": {
///     "learning_rate": 0.3,
///     "min_weight": -1.5,
///     "max_weight": 1.5,
///     "error_threshold": 0.01,
///     "max_iterations": 100000
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    pub input_size: usize,

    #[serde(default)]
    pub hidden_layers: Vec<usize>,

    pub output_size: usize,

    pub hyperparameters: HyperParameters,

    /// Seed for weight randomization; the clock is used when absent
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// Validated topology described by this configuration.
    pub fn topology(&self) -> Result<Topology> {
        Topology::from_parts(self.input_size, &self.hidden_layers, self.output_size)
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `TrainingConfig` and
/// validates both the topology and the hyperparameters.
///
/// # Errors
///
/// Resource errors for unreadable files or malformed JSON, configuration
/// errors for out-of-range values.
///
/// # Examples
///
/// ```no_run
/// use feedforward_net::config::load_config;
///
/// let cfg = load_config("config/xor.json").unwrap();
/// assert_eq!(cfg.input_size, 2);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TrainingConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ResourceError::io(path, source))?;
    let config: TrainingConfig =
        serde_json::from_str(&contents).map_err(ResourceError::from)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TrainingConfig) -> Result<()> {
    config.topology()?;
    config.hyperparameters.validate()
}
