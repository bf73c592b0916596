//! Validate and preprocess a hand image set.
//!
//! Reads `original/{hour,minute,second}.png` from the hand set, checks that
//! each image is a PNG with exactly one marker pixel, and writes cleaned
//! images to `processed/`.

use clap::Parser;
use desk_clock::backend::hand_backend::{
    self, HandImageError, ProcessOptions, ProcessedHand, locate_hand_set,
};
use desk_clock::config::AppPaths;
use desk_clock::constant::DEFAULT_BLACK_TOLERANCE;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the hand set directory
    hand_set: String,

    /// Highest RGB value still treated as black ink
    #[arg(short, long, default_value_t = DEFAULT_BLACK_TOLERANCE)]
    tolerance: u8,

    /// Directory containing hand sets, searched before the defaults
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Keep the source alpha of ink pixels instead of making them opaque
    #[arg(long, action)]
    preserve_alpha: bool,
}

fn search_roots(cli: &Cli) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = &cli.dir {
        roots.push(dir.clone());
    }
    let paths = AppPaths::resolve();
    roots.push(paths.builtin_hands_dir());
    roots.push(paths.user_hands_dir());
    roots
}

fn print_report(hand: &ProcessedHand) {
    println!("{} ({})", hand.kind.label(), hand.source.display());
    println!("  size:      {}x{}", hand.width, hand.height);
    println!("  color:     {:?} -> Rgba8", hand.source_color);
    println!(
        "  marker:    ({}, {}), {}px from the top",
        hand.marker.0,
        hand.marker.1,
        hand.marker_to_top()
    );
    println!(
        "  pixels:    {} black, {} marker, {} transparent",
        hand.stats.black, hand.stats.marker, hand.stats.transparent
    );
    println!("  saved:     {}", hand.destination.display());
}

fn run(cli: &Cli) -> Result<(), HandImageError> {
    let dir = locate_hand_set(&cli.hand_set, &search_roots(cli))?;
    println!("Processing hand set '{}' in {}", dir.name(), dir.root().display());

    let options = ProcessOptions {
        tolerance: cli.tolerance,
        preserve_alpha: cli.preserve_alpha,
    };
    let hands = hand_backend::process_hand_set(&dir, options)?;
    for hand in &hands {
        print_report(hand);
    }

    println!("All {} images processed successfully.", hands.len());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
