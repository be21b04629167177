//! Forward propagation
//!
//! For node `j` in layer `l`:
//!
//! ```text
//! theta[l][j]      = Σ_i activation[l-1][i] * weight[l-1][i][j]
//! activation[l][j] = sigmoid(theta[l][j])
//! ```
//!
//! Layers are computed in ascending order; each depends only on the one
//! before it.

use crate::error::Result;
use crate::layers::{ActivationCache, WeightStore};
use crate::utils::sigmoid;

/// Load `input` into layer 0 and recompute every later layer.
///
/// Returns the output-layer activations.
///
/// # Errors
///
/// Returns a configuration error if `input.len()` differs from the input
/// layer width. Nothing beyond layer 0 is touched in that case.
pub fn forward<'c>(
    weights: &WeightStore,
    cache: &'c mut ActivationCache,
    input: &[f64],
) -> Result<&'c [f64]> {
    cache.load_input(0, input)?;
    propagate(weights, cache);
    Ok(cache.output())
}

/// Recompute layers `1..=L` from whatever layer 0 currently holds.
///
/// The caller guarantees that `weights` and `cache` were built from the same
/// topology.
pub fn propagate(weights: &WeightStore, cache: &mut ActivationCache) {
    for layer in 1..cache.layer_count() {
        let matrix = weights.matrix(layer - 1);
        let (previous, activations, thetas) = cache.split_for_layer(layer);
        let cols = activations.len();

        for (j, (activation, theta)) in activations.iter_mut().zip(thetas.iter_mut()).enumerate() {
            let mut sum = 0.0;
            for (i, &input) in previous.iter().enumerate() {
                sum += input * matrix[i * cols + j];
            }
            *theta = sum;
            *activation = sigmoid(sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    #[test]
    fn test_forward_hand_computed() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let weights = WeightStore::from_flat(&topology, &[0.5, -0.25]).unwrap();
        let mut cache = ActivationCache::new(&topology);

        let output = forward(&weights, &mut cache, &[1.0, 2.0]).unwrap().to_vec();

        // theta = 1.0 * 0.5 + 2.0 * -0.25 = 0.0
        assert_eq!(cache.thetas(1), &[0.0]);
        assert_eq!(output, vec![0.5]);
    }

    #[test]
    fn test_forward_zero_weights_give_half() {
        let topology = Topology::new(vec![3, 4, 2]).unwrap();
        let weights = WeightStore::zeros(&topology);
        let mut cache = ActivationCache::new(&topology);

        let output = forward(&weights, &mut cache, &[0.2, 0.4, 0.6]).unwrap();
        assert_eq!(output, &[0.5, 0.5]);
    }

    #[test]
    fn test_forward_rejects_bad_input() {
        let topology = Topology::new(vec![3, 1]).unwrap();
        let weights = WeightStore::zeros(&topology);
        let mut cache = ActivationCache::new(&topology);

        assert!(forward(&weights, &mut cache, &[1.0]).is_err());
        assert_eq!(cache.output(), &[0.0]);
    }
}
