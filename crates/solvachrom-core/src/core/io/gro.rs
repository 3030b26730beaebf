use super::error::ReadError;
use super::pdb::slice_and_trim;
use super::traits::MoleculeFile;
use crate::core::models::atom::{Atom, guess_element};
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::io::BufRead;

const FORMAT: &str = "GRO";

/// GRO coordinates are in nanometers; molecules are kept in Angstroms.
const NM_TO_ANGSTROM: f64 = 10.0;

/// Reader for the GROMACS `.gro` format (title, atom count, fixed-column atoms, box).
///
/// The box line is ignored. Serial numbers are taken from the file, but wrap at 99999 in
/// large systems; residue ids likewise.
pub struct GroFile;

impl MoleculeFile for GroFile {
    type Error = ReadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut lines = reader.lines();

        // Title
        lines
            .next()
            .ok_or_else(|| ReadError::MissingRecord("title line".into()))??;

        let count_line = lines
            .next()
            .ok_or_else(|| ReadError::MissingRecord("atom count line".into()))??;
        let natoms: usize = count_line.trim().parse().map_err(|_| {
            ReadError::parse(
                FORMAT,
                2,
                format!("invalid atom count '{}'", count_line.trim()),
            )
        })?;

        let mut atoms = Vec::with_capacity(natoms);
        let mut coords = Vec::with_capacity(natoms);
        let mut residues = 0;
        let mut last_residue: Option<isize> = None;

        for i in 0..natoms {
            let line_num = i + 3;
            let line = lines.next().ok_or_else(|| {
                ReadError::parse(
                    FORMAT,
                    line_num,
                    format!("expected {} atom lines, found {}", natoms, i),
                )
            })??;

            let res_id_str = slice_and_trim(&line, 0, 5);
            let res_name = slice_and_trim(&line, 5, 10);
            let name = slice_and_trim(&line, 10, 15);
            let serial_str = slice_and_trim(&line, 15, 20);

            let res_id: isize = res_id_str.parse().map_err(|_| {
                ReadError::parse(
                    FORMAT,
                    line_num,
                    format!("invalid residue number '{}'", res_id_str),
                )
            })?;
            let serial: usize = serial_str.parse().map_err(|_| {
                ReadError::parse(
                    FORMAT,
                    line_num,
                    format!("invalid atom number '{}'", serial_str),
                )
            })?;

            let mut xyz = [0.0; 3];
            for (k, (start, end)) in [(20, 28), (28, 36), (36, 44)].into_iter().enumerate() {
                let value = slice_and_trim(&line, start, end);
                xyz[k] = value.parse::<f64>().map_err(|_| {
                    ReadError::parse(
                        FORMAT,
                        line_num,
                        format!("invalid coordinate '{}' in columns {}-{}", value, start + 1, end),
                    )
                })? * NM_TO_ANGSTROM;
            }

            let symbol = guess_element(name).ok_or_else(|| {
                ReadError::parse(
                    FORMAT,
                    line_num,
                    format!("cannot determine the element of atom '{}'", name),
                )
            })?;

            if last_residue != Some(res_id) {
                residues += 1;
                last_residue = Some(res_id);
            }
            atoms.push(Atom::new(&symbol, name, res_name, serial, res_id));
            coords.push(Point3::new(xyz[0], xyz[1], xyz[2]));
        }

        if atoms.is_empty() {
            return Err(ReadError::MissingRecord("atom lines".into()));
        }
        Ok(Molecule::new(atoms, vec![coords], residues)?)
    }
}
