use clap::Parser;
use log::{info, LevelFilter};

mod aligner;
mod cli;
mod error;
mod pairs;

use aligner::{PairAligner, Toolchain};
use anyhow::{Context, Result};
use cli::Cli;

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // RUST_LOG module directives still apply on top of the chosen level.
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();
    let (verbose, quiet) = args.get_verbosity();
    setup_logging(verbose, quiet);

    // Resolve the worklist and tools before touching the output directory.
    let source = args.pair_source()?;
    let pairs = source.pairs()?;
    let (seqtk, mafft) = args.get_tools();
    let tools = Toolchain::locate(&seqtk, &mafft)?;

    let (fasta_file, output_dir) = args.get_input();
    let aligner = PairAligner::new(fasta_file, output_dir.clone(), tools).with_context(|| {
        format!("could not create output directory {}", output_dir.display())
    })?;
    let aligned = aligner.run(pairs)?;

    info!("aligned {aligned} pair(s) into {}", output_dir.display());
    Ok(())
}
