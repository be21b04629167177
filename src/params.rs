//! Whitespace-separated parameter files
//!
//! Two layouts are understood, both read as a flat token stream:
//!
//! **Network file** (topology, hyperparameters and examples together):
//!
//! ```text
//! inputNodes hiddenCount hidden_1 .. hidden_h outputNodes exampleCount
//! learningRate minWeight maxWeight errorThreshold maxIterations
//! <exampleCount x inputNodes input values>
//! <exampleCount x outputNodes expected values>
//! ```
//!
//! **Bitmap run header** (input and output widths supplied by the caller):
//!
//! ```text
//! hiddenCount hidden_1 .. hidden_h exampleCount
//! [learningRate minWeight maxWeight errorThreshold maxIterations]   (training only)
//! [<outputNodes expected values> per image]                          (training only)
//! ```

use crate::config::HyperParameters;
use crate::dataset::ExampleSet;
use crate::error::{NetworkError, ResourceError, Result};
use crate::topology::Topology;
use std::str::FromStr;

const MAX_RESERVED_VALUES: usize = 4096;

/// Sequential reader over whitespace-separated tokens.
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    tokens: std::iter::Enumerate<std::str::SplitWhitespace<'a>>,
    consumed: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace().enumerate(),
            consumed: 0,
        }
    }

    /// Number of tokens read so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Parse the next token as `T`, naming it `what` in errors.
    pub fn read<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let (index, token) = self.tokens.next().ok_or_else(|| ResourceError::Truncated {
            what: what.to_string(),
            expected: self.consumed + 1,
            found: self.consumed,
        })?;
        self.consumed += 1;

        token.parse::<T>().map_err(|_| {
            ResourceError::Parse {
                what: what.to_string(),
                index,
                token: token.to_string(),
            }
            .into()
        })
    }

    /// Read `count` consecutive real numbers.
    ///
    /// A short stream is reported against `count`, not the whole file.
    /// `count` comes from the file itself, so the up-front reservation is capped.
    pub fn read_f64s(&mut self, count: usize, what: &str) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(count.min(MAX_RESERVED_VALUES));
        for found in 0..count {
            match self.read::<f64>(what) {
                Ok(value) => values.push(value),
                Err(NetworkError::Resource(ResourceError::Truncated { .. })) => {
                    return Err(ResourceError::Truncated {
                        what: what.to_string(),
                        expected: count,
                        found,
                    }
                    .into());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(values)
    }
}

/// Everything a network file describes.
#[derive(Debug, Clone)]
pub struct NetworkFile {
    pub topology: Topology,
    pub hyperparameters: HyperParameters,
    pub examples: ExampleSet,
}

/// Parse the network-file layout.
///
/// When `autoencoder` is set, the expected-output block is not read and
/// every example is trained to reproduce its own input (requires equal input
/// and output widths).
pub fn parse_network_file(text: &str, autoencoder: bool) -> Result<NetworkFile> {
    let mut reader = TokenReader::new(text);

    let input_nodes: usize = reader.read("input node count")?;
    let hidden = read_hidden_layers(&mut reader)?;
    let output_nodes: usize = reader.read("output node count")?;
    let topology = Topology::from_parts(input_nodes, &hidden, output_nodes)?;
    let example_count: usize = reader.read("example count")?;
    let hyperparameters = read_hyperparameters(&mut reader)?;

    let inputs = (0..example_count)
        .map(|example| reader.read_f64s(input_nodes, &format!("input vector {}", example)))
        .collect::<Result<Vec<_>>>()?;

    let examples = if autoencoder {
        ExampleSet::autoencoder(inputs)
    } else {
        let expected = (0..example_count)
            .map(|example| {
                reader.read_f64s(output_nodes, &format!("expected output {}", example))
            })
            .collect::<Result<Vec<_>>>()?;
        ExampleSet::from_pairs(inputs, expected)?
    };
    examples.validate(&topology)?;

    Ok(NetworkFile {
        topology,
        hyperparameters,
        examples,
    })
}

/// Header of a bitmap training or classification run.
#[derive(Debug, Clone)]
pub struct BitmapRunHeader {
    pub topology: Topology,
    pub example_count: usize,
    /// Present only for training runs
    pub hyperparameters: Option<HyperParameters>,
    /// One vector per image; empty for classification runs
    pub expected_outputs: Vec<Vec<f64>>,
}

/// Parse the bitmap-run layout for a network of `input_nodes` pixels and
/// `output_nodes` classes.
pub fn parse_bitmap_header(
    text: &str,
    input_nodes: usize,
    output_nodes: usize,
    training: bool,
) -> Result<BitmapRunHeader> {
    let mut reader = TokenReader::new(text);

    let hidden = read_hidden_layers(&mut reader)?;
    let topology = Topology::from_parts(input_nodes, &hidden, output_nodes)?;
    let example_count: usize = reader.read("example count")?;

    let (hyperparameters, expected_outputs) = if training {
        let hyperparameters = read_hyperparameters(&mut reader)?;
        let expected = (0..example_count)
            .map(|example| {
                reader.read_f64s(output_nodes, &format!("expected output {}", example))
            })
            .collect::<Result<Vec<_>>>()?;
        (Some(hyperparameters), expected)
    } else {
        (None, Vec::new())
    };

    Ok(BitmapRunHeader {
        topology,
        example_count,
        hyperparameters,
        expected_outputs,
    })
}

fn read_hidden_layers(reader: &mut TokenReader<'_>) -> Result<Vec<usize>> {
    let count: usize = reader.read("hidden layer count")?;
    (0..count)
        .map(|layer| reader.read(&format!("width of hidden layer {}", layer)))
        .collect()
}

fn read_hyperparameters(reader: &mut TokenReader<'_>) -> Result<HyperParameters> {
    let params = HyperParameters {
        learning_rate: reader.read("learning rate")?,
        min_weight: reader.read("minimum weight")?,
        max_weight: reader.read("maximum weight")?,
        error_threshold: reader.read("error threshold")?,
        max_iterations: reader.read("maximum iterations")?,
    };
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR_FILE: &str = "2 1 2 1 4\n0.3 -1.5 1.5 0.01 100000\n\
                            0 0\n0 1\n1 0\n1 1\n\
                            0\n1\n1\n0\n";

    #[test]
    fn test_token_reader_types() {
        let mut reader = TokenReader::new("3  0.5\n-2");
        assert_eq!(reader.read::<usize>("a").unwrap(), 3);
        assert_eq!(reader.read::<f64>("b").unwrap(), 0.5);
        assert_eq!(reader.read::<i64>("c").unwrap(), -2);
        assert_eq!(reader.consumed(), 3);
        assert!(reader.read::<f64>("d").unwrap_err().is_resource());
    }

    #[test]
    fn test_token_reader_reports_bad_token() {
        let mut reader = TokenReader::new("1 x");
        reader.read::<usize>("first").unwrap();
        let err = reader.read::<usize>("second").unwrap_err();
        assert!(err.to_string().contains("token 1"));
        assert!(err.to_string().contains("second"));
    }

    #[test]
    fn test_parse_network_file_xor() {
        let file = parse_network_file(XOR_FILE, false).unwrap();

        assert_eq!(file.topology.sizes(), &[2, 2, 1]);
        assert_eq!(file.hyperparameters.max_iterations, 100000);
        assert_eq!(file.examples.len(), 4);
        let third = file.examples.get(2).unwrap();
        assert_eq!(third.input, vec![1.0, 0.0]);
        assert_eq!(third.expected, vec![1.0]);
    }

    #[test]
    fn test_parse_network_file_truncated_examples() {
        let text = "2 0 1 2 0.3 -1 1 0.01 10  0 0 1 1  0";
        let err = parse_network_file(text, false).unwrap_err();
        assert!(err.is_resource());
        assert!(err.to_string().contains("expected output 1"));
    }

    #[test]
    fn test_parse_network_file_autoencoder() {
        let text = "2 1 3 2 2 0.5 -1 1 0.01 10  0.1 0.9  0.8 0.2";
        let file = parse_network_file(text, true).unwrap();
        assert_eq!(file.examples.get(1).unwrap().expected, vec![0.8, 0.2]);
    }

    #[test]
    fn test_parse_bitmap_header_training() {
        let text = "2 10 6 3 0.2 -0.5 0.5 0.05 500\n1 0\n0 1\n1 1";
        let header = parse_bitmap_header(text, 16, 2, true).unwrap();

        assert_eq!(header.topology.sizes(), &[16, 10, 6, 2]);
        assert_eq!(header.example_count, 3);
        assert_eq!(header.hyperparameters.unwrap().learning_rate, 0.2);
        assert_eq!(header.expected_outputs[2], vec![1.0, 1.0]);
    }

    #[test]
    fn test_parse_bitmap_header_testing() {
        let header = parse_bitmap_header("1 4 7", 16, 5, false).unwrap();

        assert_eq!(header.topology.sizes(), &[16, 4, 5]);
        assert_eq!(header.example_count, 7);
        assert!(header.hyperparameters.is_none());
        assert!(header.expected_outputs.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_hyperparameters() {
        let text = "0 2 0.0 -1 1 0.01 10";
        assert!(parse_bitmap_header(text, 4, 2, true).unwrap_err().is_config());
    }
}
