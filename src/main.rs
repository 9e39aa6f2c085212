//! PCANet CLI
//!
//! Command-line interface for demonstrating the feature extraction
//! pipeline on synthetic images.

use clap::Parser;
use pcanet::{NetworkConfig, NetworkError, PcaNet, SyntheticImages};
use std::path::PathBuf;
use tracing::{info, warn};

/// Fit a PCANet on synthetic images and report the descriptors.
#[derive(Debug, Parser)]
#[command(name = "pcanet", version, about)]
struct Args {
    /// TOML network configuration (defaults to the built-in 28x28 network).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of synthetic images to fit and transform.
    #[arg(short = 'n', long, default_value_t = 32)]
    images: usize,

    /// Number of image channels.
    #[arg(short = 'C', long, default_value_t = 1)]
    channels: usize,

    /// Seed for the synthetic image generator.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("PCANet v{}", pcanet::VERSION);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), NetworkError> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            NetworkConfig::from_file(path)?
        }
        None => NetworkConfig::default(),
    };
    info!(
        image = %config.image_shape,
        l1 = config.n_l1_output,
        l2 = config.n_l2_output,
        block = %config.block_shape,
        "Network configuration"
    );

    let mut net = PcaNet::new(config)?;
    if let Err(e) = net.validate_structure() {
        warn!("Structure check failed: {}", e);
        return Err(e);
    }

    let shape = net.config().image_shape;
    let mut generator = SyntheticImages::new(args.seed);
    info!(
        "Generating {} synthetic {} images with {} channel(s)",
        args.images, shape, args.channels
    );

    let features = if args.channels == 1 {
        let images = generator.batch(args.images, shape);
        net.fit(images.view())?;
        net.transform(images.view())?
    } else {
        let images = generator.multichannel(args.images, shape, args.channels);
        net.fit(images.view())?;
        net.transform(images.view())?
    };

    let (n_images, feature_len) = features.dim();
    let occupied = features.iter().filter(|&&v| v > 0.0).count();
    info!(
        "Extracted {} descriptors of length {} ({:.1}% of bins occupied)",
        n_images,
        feature_len,
        100.0 * occupied as f64 / (n_images * feature_len).max(1) as f64
    );

    if let Some(first) = features.outer_iter().next() {
        println!(
            "Descriptor[0] (first 16 values): {}",
            first
                .iter()
                .take(16)
                .map(|v| format!("{}", v))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }

    Ok(())
}
