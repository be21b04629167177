//! Online gradient-descent training loop
//!
//! One training run:
//!
//! 1. randomize every weight in `[min_weight, max_weight]` (once);
//! 2. for each example in order: forward pass, accumulate its error,
//!    backward pass (weights change immediately, so the next example
//!    already sees them);
//! 3. after the sweep, average the error; stop when
//!    `iterations >= max_iterations` or `average <= error_threshold`.
//!
//! Running out of iterations is an ordinary outcome, not an error.

use crate::config::HyperParameters;
use crate::dataset::ExampleSet;
use crate::error::Result;
use crate::layers::{ActivationCache, WeightStore};
use crate::loss::{average_error, example_error};
use crate::propagation::{propagate, BackwardPropagator};
use crate::topology::Topology;
use crate::utils::SimpleRng;
use std::fmt;
use tracing::{debug, info, trace};

/// Where a trainer currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    /// Constructed; weights not yet randomized for a run.
    Idle,
    /// Drawing initial weights.
    Randomizing,
    /// Sweeping the example set; holds the iteration in progress.
    Training { iteration: usize },
    /// Stopped with the average error at or below the threshold.
    Converged,
    /// Stopped because the iteration cap was reached.
    IterationCapReached,
}

/// Why a training run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingOutcome {
    Converged,
    IterationCapReached,
}

impl fmt::Display for TrainingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingOutcome::Converged => write!(f, "converged"),
            TrainingOutcome::IterationCapReached => write!(f, "iteration cap reached"),
        }
    }
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub outcome: TrainingOutcome,
    /// Number of completed sweeps over the example set
    pub iterations: usize,
    /// Average error of the last sweep
    pub final_error: f64,
    /// Lowest average error seen in any sweep
    pub best_error: f64,
    /// Average error of every sweep, in order
    pub error_history: Vec<f64>,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "outcome = {}", self.outcome)?;
        writeln!(f, "iterations = {}", self.iterations)?;
        writeln!(f, "best error = {}", self.best_error)?;
        writeln!(f, "FINAL ERROR = {}", self.final_error)
    }
}

/// Drives forward and backward passes over an example set.
///
/// Topology and hyperparameters are fixed for the lifetime of the trainer;
/// the weights persist across iterations and can be taken out afterwards for
/// inference or persistence.
///
/// # Example
///
/// ```
/// use feedforward_net::config::HyperParameters;
/// use feedforward_net::dataset::{Example, ExampleSet};
/// use feedforward_net::topology::Topology;
/// use feedforward_net::trainer::Trainer;
/// use feedforward_net::utils::SimpleRng;
///
/// let topology = Topology::new(vec![2, 1]).unwrap();
/// let params = HyperParameters {
///     learning_rate: 0.5,
///     min_weight: -1.0,
///     max_weight: 1.0,
///     error_threshold: 0.01,
///     max_iterations: 10_000,
/// };
/// let examples = ExampleSet::new(vec![Example::new(vec![1.0, 0.5], vec![1.0])]);
///
/// let mut trainer = Trainer::new(topology, params).unwrap();
/// let report = trainer.train(&examples, &mut SimpleRng::new(42)).unwrap();
/// assert!(report.final_error <= 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    topology: Topology,
    params: HyperParameters,
    weights: WeightStore,
    cache: ActivationCache,
    backward: BackwardPropagator,
    state: TrainingState,
}

impl Trainer {
    /// Create an idle trainer with zeroed weights.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `params` fails validation.
    pub fn new(topology: Topology, params: HyperParameters) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            weights: WeightStore::zeros(&topology),
            cache: ActivationCache::new(&topology),
            backward: BackwardPropagator::new(&topology),
            topology,
            params,
            state: TrainingState::Idle,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn params(&self) -> &HyperParameters {
        &self.params
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// Replace the current weights, e.g. with ones loaded from disk.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `weights` was built for another topology.
    pub fn set_weights(&mut self, weights: WeightStore) -> Result<()> {
        weights.ensure_matches(&self.topology)?;
        self.weights = weights;
        Ok(())
    }

    /// Consume the trainer and keep its weights.
    pub fn into_weights(self) -> WeightStore {
        self.weights
    }

    /// Randomize the weights and train until convergence or the iteration cap.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `examples` is empty or any vector
    /// length disagrees with the topology; weights are not touched then.
    pub fn train(&mut self, examples: &ExampleSet, rng: &mut SimpleRng) -> Result<TrainingReport> {
        examples.validate(&self.topology)?;

        info!(
            layers = ?self.topology.sizes(),
            examples = examples.len(),
            learning_rate = self.params.learning_rate,
            error_threshold = self.params.error_threshold,
            max_iterations = self.params.max_iterations,
            "starting training run"
        );

        self.state = TrainingState::Randomizing;
        self.weights
            .randomize(self.params.min_weight, self.params.max_weight, rng);

        let mut error_history = Vec::new();
        let mut best_error = f64::INFINITY;
        let mut iterations = 0;

        let outcome = loop {
            iterations += 1;
            self.state = TrainingState::Training {
                iteration: iterations,
            };

            let average = self.sweep(examples)?;
            best_error = best_error.min(average);
            error_history.push(average);
            debug!(iteration = iterations, average_error = average, "iteration complete");

            if average <= self.params.error_threshold {
                break TrainingOutcome::Converged;
            }
            if iterations >= self.params.max_iterations {
                break TrainingOutcome::IterationCapReached;
            }
        };

        self.state = match outcome {
            TrainingOutcome::Converged => TrainingState::Converged,
            TrainingOutcome::IterationCapReached => TrainingState::IterationCapReached,
        };

        let final_error = error_history.last().copied().unwrap_or(f64::INFINITY);
        info!(%outcome, iterations, final_error, best_error, "training run finished");

        Ok(TrainingReport {
            outcome,
            iterations,
            final_error,
            best_error,
            error_history,
        })
    }

    /// Run a single sweep over `examples` with the current weights.
    ///
    /// Does not randomize; useful for continuing from loaded weights or for
    /// stepping through training one iteration at a time. Returns the
    /// average error of the sweep.
    pub fn train_iteration(&mut self, examples: &ExampleSet) -> Result<f64> {
        examples.validate(&self.topology)?;
        self.sweep(examples)
    }

    fn sweep(&mut self, examples: &ExampleSet) -> Result<f64> {
        let mut error_sum = 0.0;

        for (index, example) in examples.iter().enumerate() {
            self.cache.load_input(index, &example.input)?;
            propagate(&self.weights, &mut self.cache);

            let error = example_error(self.cache.output(), &example.expected);
            trace!(example = index, error, "example processed");
            error_sum += error;

            self.backward.apply(
                &mut self.weights,
                &self.cache,
                &example.expected,
                self.params.learning_rate,
            );
        }

        Ok(average_error(error_sum, examples.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Example;

    fn params(max_iterations: usize) -> HyperParameters {
        HyperParameters {
            learning_rate: 0.5,
            min_weight: -1.0,
            max_weight: 1.0,
            error_threshold: 0.01,
            max_iterations,
        }
    }

    #[test]
    fn test_new_trainer_is_idle() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let trainer = Trainer::new(topology, params(10)).unwrap();

        assert_eq!(trainer.state(), TrainingState::Idle);
        assert!(trainer.weights().iter().all(|w| w == 0.0));
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let bad = HyperParameters {
            learning_rate: 0.0,
            ..params(10)
        };
        assert!(Trainer::new(topology, bad).unwrap_err().is_config());
    }

    #[test]
    fn test_iteration_cap_reached() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let mut trainer = Trainer::new(topology, params(3)).unwrap();
        let examples = ExampleSet::new(vec![Example::new(vec![1.0, 0.5], vec![1.0])]);

        let report = trainer.train(&examples, &mut SimpleRng::new(42)).unwrap();

        assert_eq!(report.outcome, TrainingOutcome::IterationCapReached);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.error_history.len(), 3);
        assert_eq!(trainer.state(), TrainingState::IterationCapReached);
    }

    #[test]
    fn test_converges_on_single_example() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let mut trainer = Trainer::new(topology, params(10_000)).unwrap();
        let examples = ExampleSet::new(vec![Example::new(vec![1.0, 0.5], vec![1.0])]);

        let report = trainer.train(&examples, &mut SimpleRng::new(42)).unwrap();

        assert_eq!(report.outcome, TrainingOutcome::Converged);
        assert_eq!(trainer.state(), TrainingState::Converged);
        assert!(report.final_error <= 0.01);
        assert_eq!(report.best_error, report.final_error);
    }

    #[test]
    fn test_invalid_examples_leave_trainer_idle() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let mut trainer = Trainer::new(topology, params(10)).unwrap();
        let examples = ExampleSet::new(vec![Example::new(vec![1.0], vec![1.0])]);

        assert!(trainer.train(&examples, &mut SimpleRng::new(1)).is_err());
        assert_eq!(trainer.state(), TrainingState::Idle);
    }
}
