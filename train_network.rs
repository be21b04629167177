use anyhow::Context;
use clap::Parser;
use feedforward_net::config::{load_config, HyperParameters};
use feedforward_net::dataset::ExampleSet;
use feedforward_net::params::parse_network_file;
use feedforward_net::persistence::save_weights;
use feedforward_net::topology::Topology;
use feedforward_net::trainer::{Trainer, TrainingReport};
use feedforward_net::utils::SimpleRng;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};

const DEFAULT_PARAMS: &str = "data/xor.txt";

/// Train a network described by a whitespace-separated parameter file.
///
/// File layout: input count, hidden layer count, hidden widths, output count,
/// example count, learning rate, min weight, max weight, error threshold,
/// max iterations, then every input vector and every expected output vector.
#[derive(Parser, Debug)]
#[command(name = "train_network")]
struct Args {
    /// Parameter file with topology, hyperparameters and examples
    #[arg(default_value = DEFAULT_PARAMS)]
    params: PathBuf,

    /// JSON run configuration overriding topology and hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the trained weights
    #[arg(long, default_value = "weights")]
    weights: PathBuf,

    /// Train each example to reproduce its own input
    #[arg(long)]
    autoencoder: bool,

    /// Seed for weight randomization (clock-based when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: Level,
}

struct Run {
    topology: Topology,
    hyperparameters: HyperParameters,
    examples: ExampleSet,
    seed: Option<u64>,
}

fn load_run(args: &Args) -> anyhow::Result<Run> {
    let text = fs::read_to_string(&args.params)
        .with_context(|| format!("reading parameter file {}", args.params.display()))?;
    let file = parse_network_file(&text, args.autoencoder)
        .with_context(|| format!("parsing parameter file {}", args.params.display()))?;

    let mut run = Run {
        topology: file.topology,
        hyperparameters: file.hyperparameters,
        examples: file.examples,
        seed: args.seed,
    };

    if let Some(path) = &args.config {
        let config =
            load_config(path).with_context(|| format!("loading config {}", path.display()))?;
        run.topology = config.topology()?;
        run.hyperparameters = config.hyperparameters;
        run.seed = args.seed.or(config.seed);
        run.examples.validate(&run.topology)?;
    }

    Ok(run)
}

fn print_summary(topology: &Topology, params: &HyperParameters, report: &TrainingReport) {
    println!("HYPER PARAMETERS");
    print!("{}", topology);
    println!("{}", params);
    println!("{}", report);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    let run = load_run(&args)?;
    let mut rng = match run.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };

    let mut trainer = Trainer::new(run.topology.clone(), run.hyperparameters)?;
    let report = trainer.train(&run.examples, &mut rng)?;
    print_summary(&run.topology, &run.hyperparameters, &report);

    save_weights(&args.weights, trainer.weights())
        .with_context(|| format!("writing weights to {}", args.weights.display()))?;
    info!(path = %args.weights.display(), "weights written");

    Ok(())
}
