//! Defensive PDB reading for LigParGen output.
//!
//! LigParGen writes files with a `.pdb` extension whose columns do not line up with the fixed
//! PDB column layout, so a fixed-column reader misplaces fields. Such files are recognized by
//! the marker on their first line and parsed by splitting atom records on whitespace instead.
//! Every other file is handed unchanged to a standards-compliant reader.

use super::error::ReadError;
use super::pdb::PdbFile;
use super::traits::{MoleculeFile, open_path};
use crate::core::diagnostics::Diagnostics;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use regex::Regex;
use std::io::{BufRead, Cursor, Read};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Signature comment LigParGen puts on the first line of its files.
pub const LIGPARGEN_MARKER: &str = "REMARK LIGPARGEN GENERATED PDB";

/// Default molecule id for atoms whose id field cannot be read.
pub const DEFAULT_MOL_ID: isize = 1;

const FORMAT: &str = "LigParGen PDB";

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[a-zA-Z]+").expect("element symbol pattern is valid"));

pub fn is_ligpargen_header(first_line: &str) -> bool {
    first_line.contains(LIGPARGEN_MARKER)
}

/// Whitespace-separated layout of a LigParGen atom record, with fields named by position.
///
/// ```text
/// ATOM      1  C00 UNK     1      -1.015   0.627   0.000
/// tag  serial  name res  molid       x       y       z
/// ```
///
/// The serial field is ignored; atoms are numbered by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LigParGenRecord<'l> {
    name: &'l str,
    mol_name: &'l str,
    mol_id: &'l str,
    coords: [&'l str; 3],
}

impl<'l> LigParGenRecord<'l> {
    const NAME: usize = 2;
    const MOL_NAME: usize = 3;
    const MOL_ID: usize = 4;
    const X: usize = 5;
    const FIELD_COUNT: usize = 8;

    fn tokenize(line: &'l str, line_num: usize) -> Result<Self, ReadError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < Self::FIELD_COUNT {
            return Err(ReadError::parse(
                FORMAT,
                line_num,
                format!(
                    "expected {} whitespace-separated fields in atom record, found {}",
                    Self::FIELD_COUNT,
                    fields.len()
                ),
            ));
        }
        Ok(Self {
            name: fields[Self::NAME],
            mol_name: fields[Self::MOL_NAME],
            mol_id: fields[Self::MOL_ID],
            coords: [
                fields[Self::X],
                fields[Self::X + 1],
                fields[Self::X + 2],
            ],
        })
    }
}

/// PDB reader that recovers LigParGen files and delegates everything else to `D`.
///
/// Recoverable defects (currently only an unreadable molecule id) are reported through the
/// diagnostics context and replaced by a default value.
pub struct DefensivePdbReader<'d, D = PdbFile> {
    diagnostics: &'d Diagnostics,
    _delegate: PhantomData<D>,
}

impl<'d, D> DefensivePdbReader<'d, D>
where
    D: MoleculeFile,
    ReadError: From<D::Error>,
{
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            _delegate: PhantomData,
        }
    }

    /// Reads the file at `path`.
    ///
    /// If the first line lacks the LigParGen marker, the file is closed and re-read from the
    /// start by the delegate, whose result is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Open`] if the file cannot be opened, [`ReadError::Parse`] for
    /// malformed atom records, or whatever the delegate reports.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Molecule, ReadError> {
        let path = path.as_ref();
        let mut reader = open_path(path)?;
        let mut first = String::new();
        reader.read_line(&mut first)?;

        if !is_ligpargen_header(&first) {
            drop(reader);
            debug!("{:?} is not a LigParGen file, using the standard reader.", path);
            return Ok(D::read_from_path(path)?);
        }
        debug!("{:?} carries the LigParGen marker, using recovery parsing.", path);
        self.recover(&mut reader)
    }

    /// Reads from an in-memory or already opened stream.
    ///
    /// The first line is consumed to look for the marker; when delegating, it is replayed in
    /// front of the remaining stream so the delegate sees the whole input.
    pub fn read_from(&self, reader: &mut impl BufRead) -> Result<Molecule, ReadError> {
        let mut first = String::new();
        reader.read_line(&mut first)?;

        if !is_ligpargen_header(&first) {
            let mut replayed = Cursor::new(first.into_bytes()).chain(reader);
            return Ok(D::read_from(&mut replayed)?);
        }
        self.recover(reader)
    }

    /// Parses the lines after the marker line.
    fn recover(&self, reader: &mut impl BufRead) -> Result<Molecule, ReadError> {
        let mut atoms = Vec::new();
        let mut coords = Vec::new();

        for (i, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            // The marker was line 1.
            let line_num = i + 2;
            if !line.starts_with("ATOM") && !line.starts_with("HETATM") {
                continue;
            }

            let record = LigParGenRecord::tokenize(&line, line_num)?;
            let symbol = SYMBOL_RE
                .find(record.name)
                .map(|m| m.as_str())
                .ok_or_else(|| {
                    ReadError::parse(
                        FORMAT,
                        line_num,
                        format!("no element symbol in atom name '{}'", record.name),
                    )
                })?;

            let mol_id = match record.mol_id.parse::<isize>() {
                Ok(id) => id,
                Err(e) => {
                    self.diagnostics.warn(format!(
                        "Couldn't obtain MolID for an atom in a LigParGen PDB (line {}, value '{}'): {}. Will set to {}",
                        line_num, record.mol_id, e, DEFAULT_MOL_ID
                    ));
                    DEFAULT_MOL_ID
                }
            };

            let mut xyz = [0.0; 3];
            for (k, value) in record.coords.iter().enumerate() {
                xyz[k] = value.parse().map_err(|_| {
                    ReadError::parse(
                        FORMAT,
                        line_num,
                        format!("invalid coordinate '{}'", value),
                    )
                })?;
            }

            let id = atoms.len() + 1;
            atoms.push(Atom::new(symbol, symbol, record.mol_name, id, mol_id));
            coords.push(Point3::new(xyz[0], xyz[1], xyz[2]));
        }

        if atoms.is_empty() {
            return Err(ReadError::MissingRecord("ATOM/HETATM records".into()));
        }
        debug!("Recovered {} atom(s) from LigParGen data.", atoms.len());
        Ok(Molecule::new(atoms, vec![coords], 1)?)
    }
}
