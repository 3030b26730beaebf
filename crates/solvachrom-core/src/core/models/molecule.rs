use super::atom::Atom;
use nalgebra::Point3;
use thiserror::Error;

/// One set of Cartesian coordinates (in Angstroms), one row per atom, in atom order.
pub type Frame = Vec<Point3<f64>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("A molecule needs at least one coordinate frame")]
    NoFrames,
    #[error("Frame {frame} has {rows} coordinate rows but the molecule has {atoms} atoms")]
    FrameSizeMismatch {
        frame: usize,
        rows: usize,
        atoms: usize,
    },
}

/// A molecule: its atoms and one or more coordinate frames.
///
/// The atom list and every frame are kept in file order, so the `i`-th row of each frame is
/// the position of the `i`-th atom. Charge and multiplicity are not part of any structure
/// file format read here; they default to a neutral singlet and are set by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    frames: Vec<Frame>,
    residue_count: usize,
    charge: i32,
    multiplicity: u32,
}

impl Molecule {
    /// Creates a molecule after checking that every frame matches the atom count.
    ///
    /// # Arguments
    ///
    /// * `atoms` - The atoms, in file order.
    /// * `frames` - The coordinate frames; must not be empty.
    /// * `residue_count` - Number of residues/molecules the atoms are grouped into.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError`] if there is no frame or a frame's row count differs from the
    /// number of atoms.
    pub fn new(
        atoms: Vec<Atom>,
        frames: Vec<Frame>,
        residue_count: usize,
    ) -> Result<Self, MoleculeError> {
        if frames.is_empty() {
            return Err(MoleculeError::NoFrames);
        }
        for (i, frame) in frames.iter().enumerate() {
            if frame.len() != atoms.len() {
                return Err(MoleculeError::FrameSizeMismatch {
                    frame: i,
                    rows: frame.len(),
                    atoms: atoms.len(),
                });
            }
        }
        Ok(Self {
            atoms,
            frames,
            residue_count,
            charge: 0,
            multiplicity: 1,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the first coordinate frame, the one descriptor backends work on.
    pub fn coords(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residue_count
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn set_charge(&mut self, charge: i32) {
        self.charge = charge;
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    pub fn set_multiplicity(&mut self, multiplicity: u32) {
        self.multiplicity = multiplicity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_atoms() -> Vec<Atom> {
        vec![
            Atom::new("C", "C1", "UNK", 1, 1),
            Atom::new("O", "O2", "UNK", 2, 1),
        ]
    }

    #[test]
    fn new_molecule_accepts_matching_frames() {
        let frame = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.2, 0.0, 0.0)];
        let mol = Molecule::new(two_atoms(), vec![frame.clone(), frame], 1).unwrap();
        assert_eq!(mol.len(), 2);
        assert_eq!(mol.frame_count(), 2);
        assert_eq!(mol.coords()[1], Point3::new(1.2, 0.0, 0.0));
        assert_eq!(mol.residue_count(), 1);
    }

    #[test]
    fn new_molecule_defaults_to_neutral_singlet() {
        let frame = vec![Point3::origin(), Point3::origin()];
        let mut mol = Molecule::new(two_atoms(), vec![frame], 1).unwrap();
        assert_eq!(mol.charge(), 0);
        assert_eq!(mol.multiplicity(), 1);

        mol.set_charge(-1);
        mol.set_multiplicity(2);
        assert_eq!(mol.charge(), -1);
        assert_eq!(mol.multiplicity(), 2);
    }

    #[test]
    fn new_molecule_rejects_missing_frames() {
        assert_eq!(
            Molecule::new(two_atoms(), Vec::new(), 1).unwrap_err(),
            MoleculeError::NoFrames
        );
    }

    #[test]
    fn new_molecule_rejects_frame_size_mismatch() {
        let good = vec![Point3::origin(), Point3::origin()];
        let bad = vec![Point3::origin()];
        let err = Molecule::new(two_atoms(), vec![good, bad], 1).unwrap_err();
        assert_eq!(
            err,
            MoleculeError::FrameSizeMismatch {
                frame: 1,
                rows: 1,
                atoms: 2
            }
        );
    }

    #[test]
    fn atom_lookup_is_bounds_checked() {
        let frame = vec![Point3::origin(), Point3::origin()];
        let mol = Molecule::new(two_atoms(), vec![frame], 1).unwrap();
        assert_eq!(mol.atom(1).map(|a| a.name.as_str()), Some("O2"));
        assert!(mol.atom(2).is_none());
    }
}
