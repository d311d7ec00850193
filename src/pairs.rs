use std::{
    collections::VecDeque,
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::error::{AlignError, AlignResult};

/// An ordered pair of sequence IDs to extract and align together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqPair {
    pub first: String,
    pub second: String,
}

impl SeqPair {
    pub fn new<S: Into<String>>(first: S, second: S) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    // Shared prefix of every file written for this pair.
    pub fn stem(&self) -> String {
        format!("{}_{}", self.first, self.second)
    }
}

impl fmt::Display for SeqPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.first, self.second)
    }
}

pub type Worklist = Box<dyn Iterator<Item = AlignResult<SeqPair>>>;

/// Where the worklist comes from: one pair given on the command line, or a
/// headerless two-column CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSource {
    Single(SeqPair),
    File(PathBuf),
}

impl PairSource {
    /// Open the worklist. Rows of a pairs file are read lazily, so a malformed
    /// row only surfaces once every pair before it has been handed out.
    pub fn pairs(&self) -> AlignResult<Worklist> {
        match self {
            PairSource::Single(pair) => Ok(Box::new(std::iter::once(Ok(pair.clone())))),
            PairSource::File(path) => Ok(Box::new(CsvPairs::open(path)?)),
        }
    }
}

// Rows of a headerless pairs file. The csv reader drops empty lines, so they
// are located up front and reported as zero-field rows in file order.
struct CsvPairs {
    path: PathBuf,
    records: csv::StringRecordsIntoIter<File>,
    blank_lines: VecDeque<u64>,
    done: bool,
}

impl CsvPairs {
    fn open(path: &Path) -> AlignResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| AlignError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            records: reader.into_records(),
            blank_lines: blank_lines(path)?,
            done: false,
        })
    }

    fn next_row(&mut self) -> Option<AlignResult<SeqPair>> {
        let record = match self.records.next() {
            Some(Ok(record)) => record,
            Some(Err(source)) => {
                return Some(Err(AlignError::Csv {
                    path: self.path.clone(),
                    source,
                }))
            }
            None => return self.blank_lines.pop_front().map(|line| Err(blank_row(line))),
        };

        let start = record.position().map_or(0, |p| p.line());
        if let Some(&line) = self.blank_lines.front() {
            if line < start {
                return Some(Err(blank_row(line)));
            }
        }

        // Quoted fields may span lines; empty lines inside them are data.
        let end = start
            + record
                .iter()
                .map(|field| field.matches('\n').count() as u64)
                .sum::<u64>();
        while self.blank_lines.front().is_some_and(|&line| line <= end) {
            self.blank_lines.pop_front();
        }

        if record.len() != 2 {
            return Some(Err(AlignError::MalformedRow {
                line: start,
                fields: record.len(),
            }));
        }
        Some(Ok(SeqPair::new(&record[0], &record[1])))
    }
}

impl Iterator for CsvPairs {
    type Item = AlignResult<SeqPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let row = self.next_row();
        if !matches!(row, Some(Ok(_))) {
            self.done = true;
        }
        row
    }
}

fn blank_row(line: u64) -> AlignError {
    AlignError::MalformedRow { line, fields: 0 }
}

// 1-based numbers of the empty lines in a file. A final newline does not
// start another line.
fn blank_lines(path: &Path) -> AlignResult<VecDeque<u64>> {
    let reader = BufReader::new(File::open(path)?);
    let mut blanks = VecDeque::new();
    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        if line.is_empty() || line == b"\r" {
            blanks.push_back(index as u64 + 1);
        }
    }
    Ok(blanks)
}
