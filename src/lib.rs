//! Feedforward Network Library
//!
//! A fully connected network with sigmoid activations and a sum-of-squared
//! errors loss, trained one example at a time by backpropagation.
//!
//! # Modules
//!
//! - `topology`: layer sizes
//! - `layers`: weight storage and per-pass activation cache
//! - `propagation`: forward pass and in-place backward pass
//! - `loss`: per-example and average error
//! - `trainer`: the iteration/convergence loop
//! - `inference`: forward-only prediction from trained or loaded weights
//! - `dataset`: labelled examples
//! - `config`: hyperparameters and JSON run configuration
//! - `params`: whitespace-separated parameter files
//! - `persistence`: flat text weight files
//! - `bitmap`: BMP decoding and grayscale conversion
//! - `utils`: RNG and activation functions
//! - `error`: error taxonomy

pub mod bitmap;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod layers;
pub mod loss;
pub mod params;
pub mod persistence;
pub mod propagation;
pub mod topology;
pub mod trainer;
pub mod utils;

pub use config::HyperParameters;
pub use dataset::{Example, ExampleSet};
pub use error::{ConfigError, NetworkError, ResourceError, Result};
pub use inference::{Network, Prediction};
pub use layers::{ActivationCache, WeightStore};
pub use topology::Topology;
pub use trainer::{Trainer, TrainingOutcome, TrainingReport, TrainingState};
