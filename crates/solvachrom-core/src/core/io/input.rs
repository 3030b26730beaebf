//! Bead and feature extraction from the sectioned input format.
//!
//! ```text
//! BEADS
//! 1 1,2,3/2
//! 2 3/2,4,5
//! FEATURES
//! 1 homolumogap
//! 2 sasa
//! ```
//!
//! Every data line carries an identifier (ignored here) and a payload. In a bead section the
//! payload is a comma-separated list of `atom_id[/denominator]` tokens with 1-based atom ids;
//! the atom contributes `1/denominator` of itself to the bead. In the feature section the
//! payload is a descriptor name.

use super::section::{LineClass, Section, SectionError, SectionScanner};
use crate::core::models::bead::Bead;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::{ParseFloatError, ParseIntError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to open the input file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error("Line {line} of the input file has no payload field")]
    MissingField { line: usize },
    #[error("Failed to parse the {field} field in line {line} of the input file: {kind}")]
    Token {
        line: usize,
        field: usize,
        kind: TokenErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum TokenErrorKind {
    #[error("invalid weight denominator '{value}': {source}")]
    InvalidDenominator {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("weight denominator '{value}' must be a positive, finite number")]
    NonPositiveDenominator { value: String },
    #[error("failed to convert bead id '{value}' to an integer: {source}")]
    InvalidAtomId {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("bead ids are 1-based, got '{value}'")]
    ZeroAtomId { value: String },
}

/// Extracts beads from the given section of an input stream.
///
/// Lines are ignored until the section's keyword line; each following data line becomes one
/// [`Bead`] until a later section or the end of input. A missing or empty section yields an
/// empty vector.
///
/// # Arguments
///
/// * `reader` - The buffered input stream.
/// * `section` - The section holding bead definitions (normally [`Section::Beads`]).
///
/// # Errors
///
/// Returns [`InputError`] on read failures, data lines without a payload field, or malformed
/// tokens. No partial result is returned.
pub fn parse_beads<R: BufRead>(reader: R, section: Section) -> Result<Vec<Bead>, InputError> {
    let mut beads = Vec::new();
    for_each_data_line(reader, section, |line_num, payload| {
        beads.push(parse_bead_payload(payload, line_num)?);
        Ok(())
    })?;
    debug!("Read {} bead(s) from the {} section.", beads.len(), section);
    Ok(beads)
}

/// Extracts the ordered list of feature names from the `FEATURES` section.
///
/// # Errors
///
/// Returns [`InputError`] on read failures or data lines without a payload field.
pub fn parse_features<R: BufRead>(reader: R) -> Result<Vec<String>, InputError> {
    let mut features = Vec::with_capacity(6);
    for_each_data_line(reader, Section::Features, |_, payload| {
        features.push(payload.replace('\n', ""));
        Ok(())
    })?;
    debug!("Read {} feature name(s).", features.len());
    Ok(features)
}

/// Opens `path` and runs [`parse_beads`] on it.
pub fn read_beads<P: AsRef<Path>>(path: P, section: Section) -> Result<Vec<Bead>, InputError> {
    parse_beads(open(path.as_ref())?, section)
}

/// Opens `path` and runs [`parse_features`] on it.
pub fn read_features<P: AsRef<Path>>(path: P) -> Result<Vec<String>, InputError> {
    parse_features(open(path.as_ref())?)
}

/// Everything the predictor takes from one input file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputFile {
    pub beads: Vec<Bead>,
    pub features: Vec<String>,
}

impl InputFile {
    /// Runs the bead pass and then the feature pass over `path`, each with its own handle.
    pub fn read<P: AsRef<Path>>(path: P, bead_section: Section) -> Result<Self, InputError> {
        let path = path.as_ref();
        Ok(Self {
            beads: read_beads(path, bead_section)?,
            features: read_features(path)?,
        })
    }
}

fn open(path: &Path) -> Result<BufReader<File>, InputError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Drives a [`SectionScanner`] and calls `handle` with the payload of every data line inside
/// `section`. Keyword lines are never handed over as data.
fn for_each_data_line<R, F>(reader: R, section: Section, mut handle: F) -> Result<(), InputError>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<(), InputError>,
{
    let mut reading = false;
    for scanned in SectionScanner::new(reader, section) {
        let scanned = scanned?;
        match scanned.class {
            LineClass::Continue => continue,
            LineClass::Break => break,
            LineClass::Read => {
                reading = true;
                continue;
            }
            LineClass::Unmatched if !reading => continue,
            LineClass::Unmatched => {
                let payload = scanned
                    .text
                    .split_whitespace()
                    .nth(1)
                    .ok_or(InputError::MissingField {
                        line: scanned.number,
                    })?;
                handle(scanned.number, payload)?;
            }
        }
    }
    Ok(())
}

fn parse_bead_payload(payload: &str, line: usize) -> Result<Bead, InputError> {
    let tokens: Vec<&str> = payload.split(',').collect();

    let mut indexes = Vec::with_capacity(tokens.len());
    let mut weights = Vec::with_capacity(tokens.len());
    for (field, token) in tokens.into_iter().enumerate() {
        let (index, weight) =
            parse_bead_token(token).map_err(|kind| InputError::Token { line, field, kind })?;
        indexes.push(index);
        weights.push(weight);
    }
    Ok(Bead::new(indexes, weights))
}

/// Parses `atom_id[/denominator]` into a zero-based index and a weight of `1/denominator`.
fn parse_bead_token(token: &str) -> Result<(usize, f64), TokenErrorKind> {
    let (atom, denominator) = token.split_once('/').unwrap_or((token, "1.0"));

    let parsed: f64 =
        denominator
            .parse()
            .map_err(|source| TokenErrorKind::InvalidDenominator {
                value: denominator.to_string(),
                source,
            })?;
    if !(parsed.is_finite() && parsed > 0.0) {
        return Err(TokenErrorKind::NonPositiveDenominator {
            value: denominator.to_string(),
        });
    }
    let weight = 1.0 / parsed;

    let id: usize = atom.parse().map_err(|source| TokenErrorKind::InvalidAtomId {
        value: atom.to_string(),
        source,
    })?;
    let index = id.checked_sub(1).ok_or_else(|| TokenErrorKind::ZeroAtomId {
        value: atom.to_string(),
    })?;

    Ok((index, weight))
}
