//! Error taxonomy for pair alignment runs.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed pair at line {line}: expected 2 fields, found {fields}")]
    MalformedRow { line: u64, fields: usize },

    #[error("could not read pairs file {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("external tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("external tool {tool} failed with {status}")]
    ExternalTool { tool: String, status: ExitStatus },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AlignError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}

pub type AlignResult<T> = Result<T, AlignError>;
