//! sndvol - rewrite an archived EverQuest sound at a lower volume

use clap::Parser;
use std::process;
use sndvol::{init_logging, Args, Config, Result};
use sndvol::processing::SoundProcessor;

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.verbose {
        println!("{} v{}", sndvol::NAME, sndvol::VERSION);
    }

    let config = Config::from_args(args)?;

    if config.verbose {
        println!("Root: {}", config.root.display());
        println!("Asset: {}", config.asset);
        println!("Volume: {} (gain {:.4}, {:.3} dB)", config.volume, config.gain_factor(), config.decibels());
    }

    let result = SoundProcessor::new(config.clone()).process()?;

    println!("{} ({}) -> {}", result.asset, result.container, result.output_path.display());
    if config.verbose {
        println!("Format: {}", result.report.format);
        println!("Samples: {}", result.report.samples);
        if result.report.clipped > 0 {
            println!("Clipped: {}", result.report.clipped);
        }
        println!("Time: {:.3}s", result.processing_time.as_secs_f64());
    }

    Ok(())
}
