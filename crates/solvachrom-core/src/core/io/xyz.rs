use super::error::ReadError;
use super::traits::MoleculeFile;
use crate::core::models::atom::{Atom, guess_element, normalize_symbol};
use crate::core::models::molecule::{Frame, Molecule};
use nalgebra::Point3;
use std::io::BufRead;

const FORMAT: &str = "XYZ";

/// Residue name given to XYZ atoms, which carry no residue information.
const DEFAULT_MOL_NAME: &str = "UNK";

/// Reader for (multi-frame) XYZ files.
///
/// Each frame is an atom count line, a comment line, and one `symbol x y z` line per atom.
/// Atom identity comes from the first frame; serial ids are assigned `1..=n` since the format
/// has none.
pub struct XyzFile;

impl MoleculeFile for XyzFile {
    type Error = ReadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut atoms: Vec<Atom> = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

        while let Some((count_line_num, count_line)) = lines.next() {
            let count_line = count_line?;
            if count_line.trim().is_empty() {
                continue;
            }
            let natoms: usize = count_line.trim().parse().map_err(|_| {
                ReadError::parse(
                    FORMAT,
                    count_line_num,
                    format!("invalid atom count '{}'", count_line.trim()),
                )
            })?;

            if let Some((_, comment)) = lines.next() {
                comment?;
            }

            let first_frame = frames.is_empty();
            let mut frame = Vec::with_capacity(natoms);
            for i in 0..natoms {
                let (line_num, line) = lines.next().ok_or_else(|| {
                    ReadError::parse(
                        FORMAT,
                        count_line_num + 2 + i,
                        format!("expected {} atom lines, found {}", natoms, i),
                    )
                })?;
                let line = line?;
                let (symbol, position) = parse_atom_line(&line, line_num)?;
                if first_frame {
                    atoms.push(Atom::new(&symbol, &symbol, DEFAULT_MOL_NAME, i + 1, 1));
                }
                frame.push(position);
            }
            frames.push(frame);
        }

        if atoms.is_empty() {
            return Err(ReadError::MissingRecord("atom lines".into()));
        }
        Ok(Molecule::new(atoms, frames, 1)?)
    }
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<(String, Point3<f64>), ReadError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(ReadError::parse(
            FORMAT,
            line_num,
            format!("expected 'symbol x y z', found {} field(s)", fields.len()),
        ));
    }

    let symbol = normalize_symbol(fields[0])
        .or_else(|| guess_element(fields[0]))
        .ok_or_else(|| {
            ReadError::parse(
                FORMAT,
                line_num,
                format!("unknown element '{}'", fields[0]),
            )
        })?;

    let mut xyz = [0.0; 3];
    for (k, value) in fields[1..4].iter().enumerate() {
        xyz[k] = value.parse().map_err(|_| {
            ReadError::parse(FORMAT, line_num, format!("invalid coordinate '{}'", value))
        })?;
    }
    Ok((symbol, Point3::new(xyz[0], xyz[1], xyz[2])))
}
