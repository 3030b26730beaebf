//! Standards-compliant, fixed-column PDB reader.
//!
//! Only the records needed to build a [`Molecule`] are interpreted: `ATOM`/`HETATM` for atoms
//! and coordinates, `MODEL`/`ENDMDL` to split frames, and `END` to stop. Everything else is
//! skipped.

use super::error::ReadError;
use super::traits::MoleculeFile;
use crate::core::models::atom::{Atom, guess_element, normalize_symbol};
use crate::core::models::molecule::{Frame, Molecule};
use nalgebra::Point3;
use std::io::BufRead;
use tracing::debug;

const FORMAT: &str = "PDB";

/// Minimum length of an `ATOM`/`HETATM` line that still carries all three coordinates.
const MIN_ATOM_RECORD_LEN: usize = 54;

pub(crate) fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// The record name of a line. Lines shorter than six columns (a bare `END`) are their own name.
fn record_name(line: &str) -> &str {
    line.get(0..6).unwrap_or(line).trim()
}

pub struct PdbFile;

impl MoleculeFile for PdbFile {
    type Error = ReadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut atoms: Vec<Atom> = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut current: Frame = Vec::new();
        let mut residues: Vec<(isize, String)> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match record_name(&line) {
                "ATOM" | "HETATM" => {
                    let (atom, position) = parse_atom_record(&line, line_num)?;
                    if frames.is_empty() {
                        let residue_key = (atom.mol_id, atom.mol_name.clone());
                        if residues.last() != Some(&residue_key) {
                            residues.push(residue_key);
                        }
                        atoms.push(atom);
                    }
                    current.push(position);
                }
                "ENDMDL" => {
                    if !current.is_empty() {
                        frames.push(std::mem::take(&mut current));
                    }
                }
                "END" => break,
                _ => {}
            }
        }
        if !current.is_empty() {
            frames.push(current);
        }

        if atoms.is_empty() {
            return Err(ReadError::MissingRecord("ATOM/HETATM records".into()));
        }
        debug!(
            "Read {} atom(s) in {} frame(s) from PDB data.",
            atoms.len(),
            frames.len()
        );
        Ok(Molecule::new(atoms, frames, residues.len())?)
    }
}

fn parse_atom_record(line: &str, line_num: usize) -> Result<(Atom, Point3<f64>), ReadError> {
    if line.len() < MIN_ATOM_RECORD_LEN {
        return Err(ReadError::parse(
            FORMAT,
            line_num,
            "ATOM/HETATM record is too short (must reach column 54)",
        ));
    }

    let serial_str = slice_and_trim(line, 6, 11);
    let name = slice_and_trim(line, 12, 16);
    let res_name = slice_and_trim(line, 17, 20);
    let res_seq_str = slice_and_trim(line, 22, 26);
    let element_str = slice_and_trim(line, 76, 78);

    let serial: usize = serial_str.parse().map_err(|_| {
        ReadError::parse(
            FORMAT,
            line_num,
            format!("invalid atom serial number '{}' in columns 7-11", serial_str),
        )
    })?;
    let res_seq: isize = res_seq_str.parse().map_err(|_| {
        ReadError::parse(
            FORMAT,
            line_num,
            format!(
                "invalid residue sequence number '{}' in columns 23-26",
                res_seq_str
            ),
        )
    })?;

    let x = parse_coordinate(line, line_num, 30, 38, "31-38")?;
    let y = parse_coordinate(line, line_num, 38, 46, "39-46")?;
    let z = parse_coordinate(line, line_num, 46, 54, "47-54")?;

    let symbol = normalize_symbol(element_str)
        .or_else(|| guess_element(name))
        .ok_or_else(|| {
            ReadError::parse(
                FORMAT,
                line_num,
                format!("cannot determine the element of atom '{}'", name),
            )
        })?;

    Ok((
        Atom::new(&symbol, name, res_name, serial, res_seq),
        Point3::new(x, y, z),
    ))
}

fn parse_coordinate(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &str,
) -> Result<f64, ReadError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| {
        ReadError::parse(
            FORMAT,
            line_num,
            format!("invalid coordinate '{}' in columns {}", value, columns),
        )
    })
}
