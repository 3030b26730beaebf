use super::error::ReadError;
use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading a molecular structure file format.
///
/// Implementors handle format-specific parsing of a buffered stream; opening files is
/// provided on top of that.
pub trait MoleculeFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error> + From<ReadError>;

    /// Reads a molecule from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error>;

    /// Reads a molecule from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, Self::Error> {
        let mut reader = open_path(path.as_ref())?;
        Self::read_from(&mut reader)
    }
}

/// Opens `path` for buffered reading, keeping the path in the error.
pub fn open_path(path: &Path) -> Result<BufReader<File>, ReadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })
}
