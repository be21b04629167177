//! Labelled examples fed to the trainer.

use crate::error::{ConfigError, Result};
use crate::topology::Topology;

/// One `(input, expected output)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl Example {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> Self {
        Self { input, expected }
    }
}

/// Ordered collection of examples, processed in order every iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleSet {
    examples: Vec<Example>,
}

impl ExampleSet {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// Pair input vectors with expected vectors by position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfigFile`] if the two lists have
    /// different lengths.
    pub fn from_pairs(inputs: Vec<Vec<f64>>, expected: Vec<Vec<f64>>) -> Result<Self> {
        if inputs.len() != expected.len() {
            return Err(ConfigError::InvalidConfigFile(format!(
                "{} input vectors but {} expected-output vectors",
                inputs.len(),
                expected.len()
            ))
            .into());
        }

        Ok(Self::new(
            inputs
                .into_iter()
                .zip(expected)
                .map(|(input, expected)| Example::new(input, expected))
                .collect(),
        ))
    }

    /// Examples whose expected output is the input itself.
    pub fn autoencoder(inputs: Vec<Vec<f64>>) -> Self {
        Self::new(
            inputs
                .into_iter()
                .map(|input| Example::new(input.clone(), input))
                .collect(),
        )
    }

    pub fn push(&mut self, example: Example) {
        self.examples.push(example);
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Example> {
        self.examples.get(index)
    }

    /// Check that the set is non-empty and every vector fits `topology`.
    ///
    /// The first offending example is named in the error.
    pub fn validate(&self, topology: &Topology) -> Result<()> {
        if self.examples.is_empty() {
            return Err(ConfigError::EmptyExampleSet.into());
        }

        for (index, example) in self.examples.iter().enumerate() {
            if example.input.len() != topology.input_size() {
                return Err(ConfigError::InputLength {
                    example: index,
                    expected: topology.input_size(),
                    actual: example.input.len(),
                }
                .into());
            }
            if example.expected.len() != topology.output_size() {
                return Err(ConfigError::OutputLength {
                    example: index,
                    expected: topology.output_size(),
                    actual: example.expected.len(),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a ExampleSet {
    type Item = &'a Example;
    type IntoIter = std::slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

impl FromIterator<Example> for ExampleSet {
    fn from_iter<I: IntoIterator<Item = Example>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
