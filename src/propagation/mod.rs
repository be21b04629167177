//! Forward and backward passes over a [`WeightStore`](crate::layers::WeightStore)
//!
//! - [`forward()`]: fills an [`ActivationCache`](crate::layers::ActivationCache)
//!   from an input vector.
//! - [`BackwardPropagator`]: turns a filled cache and an expected output into
//!   an in-place gradient step.

pub mod backward;
pub mod forward;

pub use backward::BackwardPropagator;
pub use forward::{forward, propagate};
