//! Per-layer scratch space rewritten on every forward pass.

use crate::error::{ConfigError, Result};
use crate::topology::Topology;

/// Activations and pre-activation sums ("thetas") for every layer.
///
/// Layer 0 holds the raw input in both sequences; no threshold is applied
/// to inputs. Layers `1..=L` are overwritten in full by each forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationCache {
    activations: Vec<Vec<f64>>,
    thetas: Vec<Vec<f64>>,
}

impl ActivationCache {
    pub fn new(topology: &Topology) -> Self {
        let activations: Vec<Vec<f64>> = topology
            .sizes()
            .iter()
            .map(|&size| vec![0.0f64; size])
            .collect();
        let thetas = activations.clone();

        Self {
            activations,
            thetas,
        }
    }

    /// Write an input vector into layer 0 (activation and theta alike).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InputLength`] when `input` does not match `n0`.
    /// `example` is only used to label the error.
    pub fn load_input(&mut self, example: usize, input: &[f64]) -> Result<()> {
        let expected = self.activations[0].len();
        if input.len() != expected {
            return Err(ConfigError::InputLength {
                example,
                expected,
                actual: input.len(),
            }
            .into());
        }

        self.activations[0].copy_from_slice(input);
        self.thetas[0].copy_from_slice(input);
        Ok(())
    }

    /// Zero every activation and theta.
    pub fn clear(&mut self) {
        for layer in self.activations.iter_mut().chain(self.thetas.iter_mut()) {
            layer.iter_mut().for_each(|value| *value = 0.0);
        }
    }

    pub fn layer_count(&self) -> usize {
        self.activations.len()
    }

    pub fn activations(&self, layer: usize) -> &[f64] {
        &self.activations[layer]
    }

    pub fn thetas(&self, layer: usize) -> &[f64] {
        &self.thetas[layer]
    }

    /// Final-layer activations.
    pub fn output(&self) -> &[f64] {
        &self.activations[self.activations.len() - 1]
    }

    /// Borrow layer `layer - 1` immutably and layer `layer` mutably.
    ///
    /// Returns `(previous activations, activations, thetas)`.
    pub(crate) fn split_for_layer(&mut self, layer: usize) -> (&[f64], &mut [f64], &mut [f64]) {
        let (before, after) = self.activations.split_at_mut(layer);
        (
            &before[layer - 1],
            &mut after[0],
            &mut self.thetas[layer],
        )
    }
}
