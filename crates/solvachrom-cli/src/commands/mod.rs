pub mod input;
pub mod inspect;
pub mod predict;

use crate::error::Result;
use solvachrom::core::diagnostics::Diagnostics;
use solvachrom::core::io::format::read_molecule;
use solvachrom::core::models::molecule::Molecule;
use std::path::{Path, PathBuf};

/// Reads the geometry at `path`, returning the cleaned path with the molecule.
fn load_molecule(path: &Path, diagnostics: &Diagnostics) -> Result<(PathBuf, Molecule)> {
    // Paths piped in from other tools may carry a trailing newline.
    let geometry = PathBuf::from(path.to_string_lossy().replace('\n', ""));
    let molecule = read_molecule(&geometry, diagnostics)?;
    Ok((geometry, molecule))
}
