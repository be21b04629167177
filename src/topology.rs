//! Layer-size description of a fully connected network
//!
//! A topology is the ordered list `[n0, n1, ..., nL]`: input width, hidden
//! widths, output width. It is validated once and never changes afterwards.

use crate::error::{ConfigError, Result};
use std::fmt;

/// Immutable sequence of layer sizes.
///
/// # Example
///
/// ```
/// use feedforward_net::topology::Topology;
///
/// let topology = Topology::from_parts(2, &[2], 1).unwrap();
/// assert_eq!(topology.sizes(), &[2, 2, 1]);
/// assert_eq!(topology.weight_count(), 2 * 2 + 2 * 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    /// Build a topology from the full list of layer sizes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTopology`] when fewer than two layers are
    /// given, any layer is empty, or the total weight count overflows `usize`.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(ConfigError::InvalidTopology(format!(
                "need at least an input and an output layer, got {} layer(s)",
                sizes.len()
            ))
            .into());
        }

        if let Some(layer) = sizes.iter().position(|&size| size == 0) {
            return Err(ConfigError::InvalidTopology(format!(
                "layer {} has no nodes",
                layer
            ))
            .into());
        }

        let total = sizes.windows(2).try_fold(0usize, |total, pair| {
            pair[0]
                .checked_mul(pair[1])
                .and_then(|count| total.checked_add(count))
        });
        if total.is_none() {
            return Err(ConfigError::InvalidTopology(
                "total weight count overflows the address space".to_string(),
            )
            .into());
        }

        Ok(Self { sizes })
    }

    /// Build a topology from input width, hidden widths and output width.
    pub fn from_parts(input: usize, hidden: &[usize], output: usize) -> Result<Self> {
        let mut sizes = Vec::with_capacity(hidden.len() + 2);
        sizes.push(input);
        sizes.extend_from_slice(hidden);
        sizes.push(output);
        Self::new(sizes)
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of layers including input and output.
    pub fn layer_count(&self) -> usize {
        self.sizes.len()
    }

    /// Number of weight matrices (`layer_count - 1`).
    pub fn boundary_count(&self) -> usize {
        self.sizes.len() - 1
    }

    pub fn layer_size(&self, layer: usize) -> usize {
        self.sizes[layer]
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    pub fn hidden_sizes(&self) -> &[usize] {
        &self.sizes[1..self.sizes.len() - 1]
    }

    /// Index of the output layer (`L`).
    pub fn output_layer(&self) -> usize {
        self.sizes.len() - 1
    }

    /// Total number of weights, `Σ n_l * n_{l+1}`.
    ///
    /// Cannot overflow; [`Topology::new`] rejects such layer sizes.
    pub fn weight_count(&self) -> usize {
        self.sizes.windows(2).map(|pair| pair[0] * pair[1]).sum()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (layer, size) in self.sizes.iter().enumerate() {
            writeln!(f, "num of activations in layer {} = {}", layer, size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_from_parts() {
        let topology = Topology::from_parts(4, &[3, 2], 1).unwrap();
        assert_eq!(topology.sizes(), &[4, 3, 2, 1]);
        assert_eq!(topology.layer_count(), 4);
        assert_eq!(topology.boundary_count(), 3);
        assert_eq!(topology.hidden_sizes(), &[3, 2]);
        assert_eq!(topology.output_layer(), 3);
        assert_eq!(topology.weight_count(), 12 + 6 + 2);
    }

    #[test]
    fn test_topology_without_hidden_layers() {
        let topology = Topology::new(vec![5, 3]).unwrap();
        assert!(topology.hidden_sizes().is_empty());
        assert_eq!(topology.input_size(), 5);
        assert_eq!(topology.output_size(), 3);
        assert_eq!(topology.weight_count(), 15);
    }

    #[test]
    fn test_topology_rejects_single_layer() {
        let err = Topology::new(vec![3]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_topology_rejects_empty_layer() {
        let err = Topology::from_parts(2, &[0], 1).unwrap_err();
        assert!(err.to_string().contains("layer 1"));
    }

    #[test]
    fn test_topology_rejects_weight_count_overflow() {
        let err = Topology::new(vec![usize::MAX, 2]).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("overflows"));

        let wide = 1usize << (usize::BITS / 2);
        assert!(Topology::new(vec![wide, wide, wide]).is_err());
    }
}
