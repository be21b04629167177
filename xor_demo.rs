use clap::Parser;
use feedforward_net::config::HyperParameters;
use feedforward_net::dataset::{Example, ExampleSet};
use feedforward_net::inference::Network;
use feedforward_net::topology::Topology;
use feedforward_net::trainer::Trainer;
use feedforward_net::utils::SimpleRng;
use tracing::Level;

// Small network to learn XOR (educational example).
const NUM_INPUTS: usize = 2;
const NUM_HIDDEN: usize = 2;
const NUM_OUTPUTS: usize = 1;
// Training hyperparameters.
const LEARNING_RATE: f64 = 0.3;
const MIN_WEIGHT: f64 = -1.5;
const MAX_WEIGHT: f64 = 1.5;
const ERROR_THRESHOLD: f64 = 0.01;
const MAX_ITERATIONS: usize = 100_000;

/// Train a 2-2-1 sigmoid network on XOR and print its predictions.
#[derive(Parser, Debug)]
#[command(name = "xor_demo")]
struct Args {
    /// Seed for weight randomization (clock-based when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: Level,
}

// XOR dataset (binary inputs and expected outputs).
fn xor_examples() -> ExampleSet {
    [
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ]
    .into_iter()
    .map(|(input, expected)| Example::new(input.to_vec(), vec![expected]))
    .collect()
}

fn hyperparameters() -> HyperParameters {
    HyperParameters {
        learning_rate: LEARNING_RATE,
        min_weight: MIN_WEIGHT,
        max_weight: MAX_WEIGHT,
        error_threshold: ERROR_THRESHOLD,
        max_iterations: MAX_ITERATIONS,
    }
}

// Simple evaluation on XOR samples.
fn test(network: &mut Network, examples: &ExampleSet) -> anyhow::Result<()> {
    println!("\nTesting the trained network:");
    for example in examples {
        let prediction = network.predict(&example.input)?;
        println!(
            "Input: {:.1}, {:.1}, Expected Output: {:.1}, Predicted Output: {:.3}",
            example.input[0], example.input[1], example.expected[0], prediction.outputs[0]
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    let mut rng = match args.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };

    let topology = Topology::from_parts(NUM_INPUTS, &[NUM_HIDDEN], NUM_OUTPUTS)?;
    let examples = xor_examples();

    // Training and testing in the same process.
    let mut trainer = Trainer::new(topology.clone(), hyperparameters())?;
    let report = trainer.train(&examples, &mut rng)?;
    print!("{}", report);

    let mut network = Network::new(topology, trainer.into_weights())?;
    test(&mut network, &examples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_examples() {
        let examples = xor_examples();
        assert_eq!(examples.len(), 4);
        assert_eq!(examples.get(3).unwrap().expected, vec![0.0]);
    }

    #[test]
    fn test_hyperparameters_valid() {
        assert!(hyperparameters().validate().is_ok());
    }
}
