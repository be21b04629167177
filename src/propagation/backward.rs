//! Backward propagation with in-place weight updates
//!
//! The sweep walks layer boundaries from the output back to the input.
//! For boundary `l` (layer `l` -> layer `l+1`) and each downstream node `j`:
//!
//! ```text
//! psi               = omega[l+1][j] * sigmoid'(theta[l+1][j])
//! omega[l+1][j]     = 0
//! omega[l][i]      += psi * weight[l][i][j]          (for every i)
//! weight[l][i][j]  += learning_rate * activation[l][i] * psi
//! ```
//!
//! `omega[l]` is complete once every `j` of boundary `l` has been visited,
//! which is before boundary `l - 1` reads it. The accumulation for each
//! weight uses its value from before the update, so the result equals a
//! full gradient step taken at the pre-example weights.
//!
//! Since `dE/dw[l][i][j] = -activation[l][i] * psi`, adding
//! `learning_rate * activation * psi` descends the error gradient.

use crate::layers::{ActivationCache, WeightStore};
use crate::topology::Topology;
use crate::utils::sigmoid_derivative;

/// Owns the per-layer omega accumulators reused across examples.
#[derive(Debug, Clone)]
pub struct BackwardPropagator {
    omegas: Vec<Vec<f64>>,
}

impl BackwardPropagator {
    pub fn new(topology: &Topology) -> Self {
        let omegas = topology
            .sizes()
            .iter()
            .map(|&size| vec![0.0f64; size])
            .collect();
        Self { omegas }
    }

    /// Apply one gradient step for the example currently held in `cache`.
    ///
    /// `cache` must hold a completed forward pass and `expected` must have
    /// one value per output node; both are checked by the caller.
    pub fn apply(
        &mut self,
        weights: &mut WeightStore,
        cache: &ActivationCache,
        expected: &[f64],
        learning_rate: f64,
    ) {
        let output_layer = self.omegas.len() - 1;
        debug_assert_eq!(expected.len(), self.omegas[output_layer].len());

        // Only consumed layers are reset by the sweep; layer 0 is never
        // consumed, so clear it here.
        self.omegas[0].iter_mut().for_each(|omega| *omega = 0.0);

        for (omega, (&target, &actual)) in self.omegas[output_layer]
            .iter_mut()
            .zip(expected.iter().zip(cache.output()))
        {
            *omega = target - actual;
        }

        for layer in (0..output_layer).rev() {
            let activations = cache.activations(layer);
            let thetas = cache.thetas(layer + 1);
            let (upstream, downstream) = self.omegas.split_at_mut(layer + 1);
            let upstream = &mut upstream[layer];
            let downstream = &mut downstream[0];
            let matrix = weights.matrix_mut(layer);
            let cols = downstream.len();

            for (j, omega) in downstream.iter_mut().enumerate() {
                let psi = *omega * sigmoid_derivative(thetas[j]);
                *omega = 0.0;

                for (i, (accumulator, &activation)) in
                    upstream.iter_mut().zip(activations).enumerate()
                {
                    let weight = &mut matrix[i * cols + j];
                    *accumulator += psi * *weight;
                    *weight += learning_rate * activation * psi;
                }
            }
        }
    }

    /// Omega accumulators, one sequence per layer.
    ///
    /// After [`apply`](Self::apply) every layer except the input layer has
    /// been consumed and reads zero; layer 0 holds the error signal
    /// propagated back to the inputs.
    pub fn omegas(&self, layer: usize) -> &[f64] {
        &self.omegas[layer]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::forward;
    use crate::utils::sigmoid;

    #[test]
    fn test_single_boundary_update() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let mut weights = WeightStore::from_flat(&topology, &[0.0, 0.0]).unwrap();
        let mut cache = ActivationCache::new(&topology);
        let mut backward = BackwardPropagator::new(&topology);

        forward(&weights, &mut cache, &[1.0, 0.5]).unwrap();
        backward.apply(&mut weights, &cache, &[1.0], 0.5);

        // output = 0.5, omega = 0.5, psi = 0.5 * 0.25 = 0.125
        let psi = 0.125;
        assert!((weights.get(0, 0, 0) - 0.5 * 1.0 * psi).abs() < 1e-15);
        assert!((weights.get(0, 1, 0) - 0.5 * 0.5 * psi).abs() < 1e-15);
    }

    #[test]
    fn test_omegas_consumed_after_sweep() {
        let topology = Topology::new(vec![2, 3, 2]).unwrap();
        let mut weights = WeightStore::from_flat(
            &topology,
            &[0.1, -0.2, 0.3, 0.4, -0.5, 0.6, 0.7, -0.8, 0.9, 1.0, -1.1, 1.2],
        )
        .unwrap();
        let mut cache = ActivationCache::new(&topology);
        let mut backward = BackwardPropagator::new(&topology);

        forward(&weights, &mut cache, &[0.3, 0.9]).unwrap();
        backward.apply(&mut weights, &cache, &[1.0, 0.0], 0.3);

        assert!(backward.omegas(1).iter().all(|&omega| omega == 0.0));
        assert!(backward.omegas(2).iter().all(|&omega| omega == 0.0));
    }

    #[test]
    fn test_input_omegas_do_not_leak_between_examples() {
        let topology = Topology::new(vec![1, 1]).unwrap();
        let mut weights = WeightStore::from_flat(&topology, &[0.5]).unwrap();
        let mut cache = ActivationCache::new(&topology);
        let mut backward = BackwardPropagator::new(&topology);

        forward(&weights, &mut cache, &[1.0]).unwrap();
        backward.apply(&mut weights, &cache, &[1.0], 0.0);
        let first = backward.omegas(0)[0];
        backward.apply(&mut weights, &cache, &[1.0], 0.0);

        let expected = (1.0 - sigmoid(0.5)) * sigmoid_derivative(0.5) * 0.5;
        assert!((first - expected).abs() < 1e-15);
        assert_eq!(backward.omegas(0)[0], first);
    }
}
