use crate::core::models::molecule::MoleculeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a structure file into a molecule.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open '{path}': {source}", path = path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} data on line {line}: {details}")]
    Parse {
        format: &'static str,
        line: usize,
        details: String,
    },

    #[error("Missing required record: {0}")]
    MissingRecord(String),

    #[error("Inconsistent structure: {0}")]
    Molecule(#[from] MoleculeError),
}

impl ReadError {
    pub fn parse(format: &'static str, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }
}
