//! Inference with a populated weight store
//!
//! Runs the forward pass only; weights are never modified here.

use crate::error::Result;
use crate::layers::{ActivationCache, WeightStore};
use crate::propagation::forward;
use crate::topology::Topology;

/// Output of one forward pass together with the winning class.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Every output activation, in node order
    pub outputs: Vec<f64>,
    /// 0-based index of the highest output (first one wins ties)
    pub class_index: usize,
}

impl Prediction {
    pub fn from_outputs(outputs: Vec<f64>) -> Self {
        let mut class_index = 0;
        for (index, &value) in outputs.iter().enumerate().skip(1) {
            if value > outputs[class_index] {
                class_index = index;
            }
        }
        Self {
            outputs,
            class_index,
        }
    }

    /// 1-based class label, as shown to users.
    pub fn label(&self) -> usize {
        self.class_index + 1
    }

    /// Activation of the winning output node; `None` when there are no outputs.
    pub fn confidence(&self) -> Option<f64> {
        self.outputs.get(self.class_index).copied()
    }
}

/// Forward-only network built from trained or loaded weights.
///
/// # Example
///
/// ```
/// use feedforward_net::inference::Network;
/// use feedforward_net::layers::WeightStore;
/// use feedforward_net::topology::Topology;
///
/// let topology = Topology::new(vec![2, 2]).unwrap();
/// let weights = WeightStore::from_flat(&topology, &[1.0, -1.0, 1.0, -1.0]).unwrap();
/// let mut network = Network::new(topology, weights).unwrap();
///
/// let prediction = network.predict(&[1.0, 1.0]).unwrap();
/// assert_eq!(prediction.class_index, 0);
/// assert_eq!(prediction.label(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    weights: WeightStore,
    cache: ActivationCache,
}

impl Network {
    /// # Errors
    ///
    /// Returns a configuration error if `weights` does not fit `topology`.
    pub fn new(topology: Topology, weights: WeightStore) -> Result<Self> {
        weights.ensure_matches(&topology)?;
        Ok(Self {
            cache: ActivationCache::new(&topology),
            topology,
            weights,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// Final-layer activations for `input`.
    pub fn run(&mut self, input: &[f64]) -> Result<&[f64]> {
        forward(&self.weights, &mut self.cache, input)
    }

    pub fn predict(&mut self, input: &[f64]) -> Result<Prediction> {
        let outputs = self.run(input)?.to_vec();
        Ok(Prediction::from_outputs(outputs))
    }

    /// Predict every input in order.
    pub fn predict_all<'a, I>(&mut self, inputs: I) -> Result<Vec<Prediction>>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        inputs.into_iter().map(|input| self.predict(input)).collect()
    }

    /// Activations of the last forward pass.
    pub fn cache(&self) -> &ActivationCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_argmax_first_position() {
        let prediction = Prediction::from_outputs(vec![0.9, 0.1, 0.3]);
        assert_eq!(prediction.class_index, 0);
        assert_eq!(prediction.label(), 1);
        assert_eq!(prediction.confidence(), Some(0.9));
    }

    #[test]
    fn test_prediction_argmax_last_position() {
        let prediction = Prediction::from_outputs(vec![0.1, 0.2, 0.7]);
        assert_eq!(prediction.class_index, 2);
        assert_eq!(prediction.label(), 3);
    }

    #[test]
    fn test_prediction_ties_pick_lowest_index() {
        let prediction = Prediction::from_outputs(vec![0.4, 0.6, 0.6]);
        assert_eq!(prediction.class_index, 1);
    }

    #[test]
    fn test_prediction_without_outputs() {
        let prediction = Prediction::from_outputs(Vec::new());
        assert_eq!(prediction.class_index, 0);
        assert_eq!(prediction.confidence(), None);
    }

    #[test]
    fn test_network_rejects_mismatched_weights() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let other = Topology::new(vec![3, 1]).unwrap();
        let weights = WeightStore::zeros(&other);
        assert!(Network::new(topology, weights).unwrap_err().is_config());
    }

    #[test]
    fn test_network_predict_all() {
        let topology = Topology::new(vec![1, 2]).unwrap();
        let weights = WeightStore::from_flat(&topology, &[2.0, -2.0]).unwrap();
        let mut network = Network::new(topology, weights).unwrap();

        let inputs = [vec![1.0], vec![-1.0]];
        let predictions = network
            .predict_all(inputs.iter().map(Vec::as_slice))
            .unwrap();

        assert_eq!(predictions[0].class_index, 0);
        assert_eq!(predictions[1].class_index, 1);
    }
}
