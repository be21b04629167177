//! Shared utilities for the network
//!
//! This module provides the seeded random number generator and the sigmoid
//! threshold function used by propagation and training.

pub mod activations;
pub mod rng;

pub use activations::{sigmoid, sigmoid_derivative};
pub use rng::SimpleRng;
