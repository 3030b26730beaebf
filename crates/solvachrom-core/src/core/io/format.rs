use super::error::ReadError;
use super::gro::GroFile;
use super::ligpargen::DefensivePdbReader;
use super::pdb::PdbFile;
use super::traits::MoleculeFile;
use super::xyz::XyzFile;
use crate::core::diagnostics::Diagnostics;
use crate::core::models::molecule::Molecule;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Structure file formats selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Gro,
    /// Read through [`DefensivePdbReader`], so LigParGen output is recovered.
    Pdb,
    /// Also the fallback for unknown or missing extensions.
    Xyz,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext.as_deref() {
            Some("gro") => Format::Gro,
            Some("pdb") => Format::Pdb,
            _ => Format::Xyz,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Gro => "GRO",
            Format::Pdb => "PDB",
            Format::Xyz => "XYZ",
        };
        f.write_str(name)
    }
}

/// Reads a molecule from `path`, choosing the reader from its extension.
///
/// # Errors
///
/// Returns the [`ReadError`] of the selected reader.
pub fn read_molecule<P: AsRef<Path>>(
    path: P,
    diagnostics: &Diagnostics,
) -> Result<Molecule, ReadError> {
    let path = path.as_ref();
    let format = Format::from_path(path);
    info!("Reading {} structure from {:?}.", format, path);
    match format {
        Format::Gro => GroFile::read_from_path(path),
        Format::Pdb => DefensivePdbReader::<PdbFile>::new(diagnostics).read_path(path),
        Format::Xyz => XyzFile::read_from_path(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::ligpargen::LIGPARGEN_MARKER;
    use std::fs;

    #[test]
    fn format_is_chosen_by_lowercased_extension() {
        assert_eq!(Format::from_path(Path::new("mol.gro")), Format::Gro);
        assert_eq!(Format::from_path(Path::new("mol.GRO")), Format::Gro);
        assert_eq!(Format::from_path(Path::new("a.b/mol.Pdb")), Format::Pdb);
        assert_eq!(Format::from_path(Path::new("mol.xyz")), Format::Xyz);
    }

    #[test]
    fn unknown_or_missing_extension_falls_back_to_xyz() {
        assert_eq!(Format::from_path(Path::new("mol.mol2")), Format::Xyz);
        assert_eq!(Format::from_path(Path::new("mol")), Format::Xyz);
        assert_eq!(Format::from_path(Path::new("dir.d/mol")), Format::Xyz);
    }

    #[test]
    fn reads_each_format_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let diagnostics = Diagnostics::new();

        let xyz = dir.path().join("water.dat");
        fs::write(&xyz, "1\n\nO 0.0 0.0 0.0\n").unwrap();
        assert_eq!(read_molecule(&xyz, &diagnostics).unwrap().len(), 1);

        let gro = dir.path().join("water.gro");
        fs::write(&gro, "t\n    1\n    1SOL     OW    1   0.100   0.000   0.000\n").unwrap();
        let mol = read_molecule(&gro, &diagnostics).unwrap();
        assert!((mol.coords()[0].x - 1.0).abs() < 1e-9);

        let pdb = dir.path().join("lig.pdb");
        fs::write(
            &pdb,
            format!("{LIGPARGEN_MARKER}\nATOM 1 C00 UNK x 0.0 0.0 0.0\n"),
        )
        .unwrap();
        let mol = read_molecule(&pdb, &diagnostics).unwrap();
        assert_eq!(mol.atoms()[0].mol_id, 1);
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let diagnostics = Diagnostics::new();
        assert!(matches!(
            read_molecule("/no/such/file.gro", &diagnostics),
            Err(ReadError::Open { .. })
        ));
    }
}
