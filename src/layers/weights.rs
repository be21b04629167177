//! Trainable weights of a fully connected network
//!
//! One dense matrix per layer boundary `(l, l+1)`, indexed
//! `[input_node][output_node]` and stored row-major, so
//! `weight[l][i][j]` lives at `matrices[l][i * n_{l+1} + j]`.
//!
//! Flattening every matrix in boundary order gives the persistence order
//! `layer -> input node -> output node`.

use crate::error::{ConfigError, ResourceError, Result};
use crate::topology::Topology;
use crate::utils::SimpleRng;

/// Owner of all trainable parameters.
///
/// Shapes are fixed by the topology at construction and never change.
///
/// # Example
///
/// ```
/// use feedforward_net::layers::WeightStore;
/// use feedforward_net::topology::Topology;
/// use feedforward_net::utils::SimpleRng;
///
/// let topology = Topology::new(vec![3, 2, 1]).unwrap();
/// let mut weights = WeightStore::zeros(&topology);
/// weights.randomize(-1.0, 1.0, &mut SimpleRng::new(42));
/// assert_eq!(weights.len(), 3 * 2 + 2 * 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStore {
    sizes: Vec<usize>,
    matrices: Vec<Vec<f64>>,
}

impl WeightStore {
    /// Create a store with every weight set to zero.
    pub fn zeros(topology: &Topology) -> Self {
        let sizes = topology.sizes().to_vec();
        let matrices = sizes
            .windows(2)
            .map(|pair| vec![0.0f64; pair[0] * pair[1]])
            .collect();

        Self { sizes, matrices }
    }

    /// Create a store with every weight drawn uniformly from `[min, max]`.
    pub fn randomized(topology: &Topology, min: f64, max: f64, rng: &mut SimpleRng) -> Self {
        let mut store = Self::zeros(topology);
        store.randomize(min, max, rng);
        store
    }

    /// Build a store from a flat sequence in persistence order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Truncated`] unless exactly
    /// `topology.weight_count()` values are supplied.
    pub fn from_flat(topology: &Topology, values: &[f64]) -> Result<Self> {
        // Compare lengths before allocating the zeroed store.
        let expected = topology.weight_count();
        if values.len() != expected {
            return Err(ResourceError::Truncated {
                what: "weight sequence".to_string(),
                expected,
                found: values.len(),
            }
            .into());
        }

        let mut store = Self::zeros(topology);
        store.load_flat(values)?;
        Ok(store)
    }

    /// Overwrite every weight with uniform samples from `[min, max]`.
    ///
    /// Weights are visited in persistence order, so a given seed always
    /// produces the same store.
    pub fn randomize(&mut self, min: f64, max: f64, rng: &mut SimpleRng) {
        for matrix in &mut self.matrices {
            for value in matrix.iter_mut() {
                *value = rng.gen_range_f64(min, max);
            }
        }
    }

    /// Replace every weight from a flat sequence in persistence order.
    ///
    /// The store is left untouched when the length does not match.
    pub fn load_flat(&mut self, values: &[f64]) -> Result<()> {
        let expected = self.len();
        if values.len() != expected {
            return Err(ResourceError::Truncated {
                what: "weight sequence".to_string(),
                expected,
                found: values.len(),
            }
            .into());
        }

        let mut offset = 0;
        for matrix in &mut self.matrices {
            let count = matrix.len();
            matrix.copy_from_slice(&values[offset..offset + count]);
            offset += count;
        }

        Ok(())
    }

    /// Flatten every weight in persistence order.
    pub fn to_flat(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Iterate over every weight in persistence order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.matrices.iter().flat_map(|matrix| matrix.iter().copied())
    }

    /// Total number of weights.
    pub fn len(&self) -> usize {
        self.matrices.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of weight matrices.
    pub fn boundary_count(&self) -> usize {
        self.matrices.len()
    }

    /// Layer sizes this store was built for.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Check that this store was built for `topology`.
    pub fn ensure_matches(&self, topology: &Topology) -> Result<()> {
        if self.sizes != topology.sizes() {
            return Err(ConfigError::InvalidTopology(format!(
                "weights were built for layers {:?}, network uses {:?}",
                self.sizes,
                topology.sizes()
            ))
            .into());
        }
        Ok(())
    }

    /// `(rows, cols)` of the matrix for boundary `layer`.
    pub fn boundary_shape(&self, layer: usize) -> (usize, usize) {
        (self.sizes[layer], self.sizes[layer + 1])
    }

    pub fn get(&self, layer: usize, input_node: usize, output_node: usize) -> f64 {
        let cols = self.sizes[layer + 1];
        self.matrices[layer][input_node * cols + output_node]
    }

    pub fn set(&mut self, layer: usize, input_node: usize, output_node: usize, value: f64) {
        let cols = self.sizes[layer + 1];
        self.matrices[layer][input_node * cols + output_node] = value;
    }

    /// Row-major matrix for boundary `layer`.
    pub fn matrix(&self, layer: usize) -> &[f64] {
        &self.matrices[layer]
    }

    pub fn matrix_mut(&mut self, layer: usize) -> &mut [f64] {
        &mut self.matrices[layer]
    }
}
