use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{
    error::{AlignError, AlignResult},
    pairs::{PairSource, SeqPair},
};

#[derive(Parser)]
#[command(author, version, about = "Extract pairs of sequences from a FASTA file and align each pair", long_about = None)]
pub struct Cli {
    /// a FASTA-formatted file holding every sequence named in the pairs
    #[arg(short = 'f', long = "fasta_file", value_name = "FILE", required = true)]
    fasta_file: PathBuf,

    /// a CSV file of sequence ID pairs, two columns and no header;
    /// ignored when both --id1 and --id2 are given
    #[arg(short = 'p', long = "pairs_file", value_name = "FILE")]
    pairs_file: Option<PathBuf>,

    /// write alignments to this directory (created if missing)
    #[arg(short = 'o', long = "output_dir", value_name = "DIR", required = true)]
    output_dir: PathBuf,

    /// first sequence ID of a single pair
    #[arg(long)]
    id1: Option<String>,

    /// second sequence ID of a single pair
    #[arg(long)]
    id2: Option<String>,

    /// seqtk executable used to extract sequences
    #[arg(long, env = "ALIGN_PAIRS_SEQTK", default_value = "seqtk", value_name = "PATH")]
    seqtk: String,

    /// mafft executable used to align each pair
    #[arg(long, env = "ALIGN_PAIRS_MAFFT", default_value = "mafft", value_name = "PATH")]
    mafft: String,

    /// more log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    pub fn get_input(&self) -> (PathBuf, PathBuf) {
        (self.fasta_file.clone(), self.output_dir.clone())
    }

    pub fn get_tools(&self) -> (String, String) {
        (self.seqtk.clone(), self.mafft.clone())
    }

    pub fn get_verbosity(&self) -> (u8, bool) {
        (self.verbose, self.quiet)
    }

    // A complete --id1/--id2 pair wins over a pairs file.
    pub fn pair_source(&self) -> AlignResult<PairSource> {
        match (&self.id1, &self.id2, &self.pairs_file) {
            (Some(id1), Some(id2), _) => Ok(PairSource::Single(SeqPair::new(id1, id2))),
            (_, _, Some(path)) => Ok(PairSource::File(path.clone())),
            _ => Err(AlignError::config(
                "either --id1 and --id2 or --pairs_file must be provided",
            )),
        }
    }
}
