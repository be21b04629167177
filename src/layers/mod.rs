//! Network state: trainable weights and per-pass activation scratch
//!
//! [`WeightStore`] is the only state that survives across training
//! iterations. [`ActivationCache`] is rewritten by every forward pass.

pub mod cache;
pub mod weights;

pub use cache::ActivationCache;
pub use weights::WeightStore;
