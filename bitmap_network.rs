use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use feedforward_net::bitmap::load_grayscale;
use feedforward_net::dataset::{Example, ExampleSet};
use feedforward_net::error::ConfigError;
use feedforward_net::inference::Network;
use feedforward_net::params::parse_bitmap_header;
use feedforward_net::persistence::{load_weights, save_weights};
use feedforward_net::trainer::Trainer;
use feedforward_net::utils::SimpleRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// Train on, or classify, a directory of bitmap images.
#[derive(Parser, Debug)]
#[command(name = "bitmap_network")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on trainingimage{N}.bmp and write the weights
    Train(RunArgs),
    /// Load weights and classify testimage{N}.bmp
    Test(RunArgs),
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// Number of pixels per image (input layer width)
    #[arg(long)]
    pixels: usize,

    /// Number of classes (output layer width)
    #[arg(long, default_value_t = 5)]
    classes: usize,

    /// Run header: hidden layers, image count, hyperparameters and labels
    #[arg(long)]
    params: PathBuf,

    /// Directory holding the numbered bitmap files
    #[arg(long)]
    images: PathBuf,

    /// Weights file written by `train` and read by `test`
    #[arg(long, default_value = "weights")]
    weights: PathBuf,

    /// Seed for weight randomization (clock-based when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn image_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}{}.bmp", prefix, index))
}

fn load_image(dir: &Path, prefix: &str, index: usize, pixels: usize) -> anyhow::Result<Vec<f64>> {
    let path = image_path(dir, prefix, index);
    let intensities =
        load_grayscale(&path).with_context(|| format!("decoding {}", path.display()))?;
    if intensities.len() != pixels {
        return Err(ConfigError::InputLength {
            example: index,
            expected: pixels,
            actual: intensities.len(),
        })
        .with_context(|| format!("image {} does not match --pixels", path.display()));
    }
    Ok(intensities)
}

fn train(args: &RunArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.params)
        .with_context(|| format!("reading {}", args.params.display()))?;
    let header = parse_bitmap_header(&text, args.pixels, args.classes, true)?;
    let params = header
        .hyperparameters
        .context("training header is missing hyperparameters")?;

    let mut examples = ExampleSet::default();
    for (index, expected) in header.expected_outputs.into_iter().enumerate() {
        let input = load_image(&args.images, "trainingimage", index, args.pixels)?;
        examples.push(Example::new(input, expected));
    }
    info!(images = examples.len(), "training images loaded");

    let mut rng = match args.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };
    let mut trainer = Trainer::new(header.topology.clone(), params)?;
    let report = trainer.train(&examples, &mut rng)?;

    println!("HYPER PARAMETERS");
    print!("{}", header.topology);
    println!("{}", params);
    println!("{}", report);

    save_weights(&args.weights, trainer.weights())?;
    Ok(())
}

fn test(args: &RunArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.params)
        .with_context(|| format!("reading {}", args.params.display()))?;
    let header = parse_bitmap_header(&text, args.pixels, args.classes, false)?;
    let weights = load_weights(&args.weights, &header.topology)
        .with_context(|| format!("loading weights from {}", args.weights.display()))?;
    let mut network = Network::new(header.topology, weights)?;

    for index in 0..header.example_count {
        let input = load_image(&args.images, "testimage", index, args.pixels)?;
        let prediction = network.predict(&input)?;
        for (class, value) in prediction.outputs.iter().enumerate() {
            println!("{}: {}", class + 1, value);
        }
        println!("testimage{} is: {}\n", index, prediction.label());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).init();

    match &cli.command {
        Command::Train(args) => train(args),
        Command::Test(args) => test(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path() {
        let path = image_path(Path::new("data"), "testimage", 3);
        assert_eq!(path, Path::new("data").join("testimage3.bmp"));
    }

    #[test]
    fn test_load_image_missing_file() {
        let dir = std::env::temp_dir().join("bitmap_network_missing_dir");
        assert!(load_image(&dir, "testimage", 0, 4).is_err());
    }
}
