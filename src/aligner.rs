use std::{
    collections::HashSet,
    ffi::OsStr,
    fs::{self, File},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, info, warn};
use noodles::fasta;
use tempfile::{Builder, NamedTempFile, TempPath};

use crate::{
    error::{AlignError, AlignResult},
    pairs::{SeqPair, Worklist},
};

/// Resolved locations of the extraction and alignment executables.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub seqtk: PathBuf,
    pub mafft: PathBuf,
}

impl Toolchain {
    // Resolve both tools up front so a missing one fails the run before any
    // output is written.
    pub fn locate(seqtk: &str, mafft: &str) -> AlignResult<Self> {
        Ok(Self {
            seqtk: locate_tool(seqtk)?,
            mafft: locate_tool(mafft)?,
        })
    }
}

fn locate_tool(name: &str) -> AlignResult<PathBuf> {
    let path = which::which(name).map_err(|_| AlignError::ToolNotFound {
        tool: name.to_string(),
    })?;
    debug!("using {name} at {}", path.display());
    Ok(path)
}

/// Extracts each pair of sequences from one FASTA file and aligns them,
/// writing `{id1}_{id2}_aligned.aln` into the output directory.
pub struct PairAligner {
    fasta_file: PathBuf,
    output_dir: PathBuf,
    tools: Toolchain,
}

impl PairAligner {
    // Creating a PairAligner creates the output directory and its parents.
    pub fn new(fasta_file: PathBuf, output_dir: PathBuf, tools: Toolchain) -> AlignResult<Self> {
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            fasta_file,
            output_dir,
            tools,
        })
    }

    /// Process the worklist in order, stopping at the first error. Outputs
    /// already written are left in place. Returns the number of pairs aligned.
    pub fn run(&self, pairs: Worklist) -> AlignResult<usize> {
        let mut aligned = 0;
        for pair in pairs {
            let pair = pair?;
            info!("aligning {pair}");
            let output = self.extract_and_align(&pair)?;
            info!("wrote {}", output.display());
            aligned += 1;
        }
        Ok(aligned)
    }

    /// Extract the two sequences with seqtk, align them with mafft and return
    /// the path of the alignment. The ID list and the extracted FASTA are
    /// removed whether or not the tools succeed.
    pub fn extract_and_align(&self, pair: &SeqPair) -> AlignResult<PathBuf> {
        let stem = pair.stem();

        let mut ids = NamedTempFile::new()?;
        writeln!(ids, "{}", pair.first)?;
        writeln!(ids, "{}", pair.second)?;
        ids.flush()?;
        debug!("wrote ID list {}", ids.path().display());

        let extracted_path = self.output_dir.join(format!("{stem}_extracted.fa"));
        let extracted_file = File::create(&extracted_path)?;
        let extracted = TempPath::try_from_path(extracted_path)?;
        run_tool(
            &self.tools.seqtk,
            &[
                OsStr::new("subseq"),
                self.fasta_file.as_os_str(),
                ids.path().as_os_str(),
            ],
            extracted_file,
        )?;

        let missing = missing_ids(&extracted, pair)?;
        if !missing.is_empty() {
            warn!(
                "{} not found in {}",
                missing.join(", "),
                self.fasta_file.display()
            );
        }

        // Written under a scratch name and renamed over any earlier result
        // only once mafft exits cleanly.
        let aligned = Builder::new()
            .prefix(&format!(".{stem}_aligned."))
            .suffix(".tmp")
            .tempfile_in(&self.output_dir)?;
        run_tool(
            &self.tools.mafft,
            &[
                OsStr::new("--auto"),
                OsStr::new("--quiet"),
                OsStr::new("--clustalout"),
                extracted.as_os_str(),
            ],
            aligned.as_file().try_clone()?,
        )?;

        extracted.close()?;
        ids.close()?;
        let output = self.output_dir.join(format!("{stem}_aligned.aln"));
        aligned.persist(&output).map_err(io::Error::from)?;
        Ok(output)
    }
}

// Run a tool to completion with its standard output sent to `stdout`.
fn run_tool(program: &Path, args: &[&OsStr], stdout: File) -> AlignResult<()> {
    let tool = program.display().to_string();
    debug!(
        "running {tool} {}",
        args.iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .status()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AlignError::ToolNotFound { tool: tool.clone() },
            _ => AlignError::Io(e),
        })?;

    if !status.success() {
        return Err(AlignError::ExternalTool { tool, status });
    }
    Ok(())
}

// IDs of the pair that have no record in the extracted FASTA.
fn missing_ids(extracted: &Path, pair: &SeqPair) -> AlignResult<Vec<String>> {
    let mut reader = File::open(extracted)
        .map(BufReader::new)
        .map(fasta::Reader::new)?;

    let mut found = HashSet::new();
    for result in reader.records() {
        let record = result?;
        found.insert(record.name().to_string());
    }

    Ok([&pair.first, &pair.second]
        .into_iter()
        .filter(|id| !found.contains(id.as_str()))
        .cloned()
        .collect())
}
