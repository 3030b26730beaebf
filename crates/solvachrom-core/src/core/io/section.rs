//! Line classifier for the sectioned input format.
//!
//! An input file is a sequence of optional sections, each introduced by a keyword line, that
//! must appear in the fixed order of [`Section`]. Callers ask for one section at a time and
//! receive, for every line, a [`LineClass`] telling them whether to skip it, stop, start
//! reading, or treat it as data.

use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("Keyword requested not in file format: '{0}'")]
    UnknownKeyword(String),
    #[error("Failed to read line {line} in input: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// Section keywords of the input format, declared in the order they must appear in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Section {
    Beads,
    Vsites,
    Bonds,
    Angles,
    Dihedrals,
    Improper,
    Features,
}

impl Section {
    /// Every section, in file order.
    pub const ALL: [Section; 7] = [
        Section::Beads,
        Section::Vsites,
        Section::Bonds,
        Section::Angles,
        Section::Dihedrals,
        Section::Improper,
        Section::Features,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Section::Beads => "BEADS",
            Section::Vsites => "VSITES",
            Section::Bonds => "BONDS",
            Section::Angles => "ANGLES",
            Section::Dihedrals => "DIHEDRALS",
            Section::Improper => "IMPROPER",
            Section::Features => "FEATURES",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Section {
    type Err = SectionError;

    /// Parses an exact, case-sensitive section keyword.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::UnknownKeyword`] for anything that is not one of the seven
    /// keywords; this is a caller mistake rather than a data error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.keyword() == s)
            .ok_or_else(|| SectionError::UnknownKeyword(s.to_string()))
    }
}

/// What a caller scanning for one section should do with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Skip the line: blank, comment, or the keyword of an earlier section.
    Continue,
    /// The wanted section is over: a later section's keyword or end of input.
    Break,
    /// The keyword line of the wanted section.
    Read,
    /// No keyword matched. A data line if the caller is inside its section, noise otherwise.
    Unmatched,
}

/// Classifies one line (with or without its trailing newline) relative to `target`.
pub fn classify_line(line: &str, target: Section) -> LineClass {
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return LineClass::Continue;
    }

    for section in Section::ALL {
        if line.starts_with(section.keyword()) {
            return match section.cmp(&target) {
                Ordering::Greater => LineClass::Break,
                Ordering::Less => LineClass::Continue,
                Ordering::Equal => LineClass::Read,
            };
        }
    }
    LineClass::Unmatched
}

/// A line yielded by [`SectionScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// 1-based line number; for the end-of-input marker, one past the last line.
    pub number: usize,
    pub class: LineClass,
    /// Raw line content including the trailing newline, empty at end of input.
    pub text: String,
}

/// Walks a reader line by line, classifying each line against a target section.
///
/// End of input is yielded once as a [`LineClass::Break`] line; iteration stops after that or
/// after the first read error.
pub struct SectionScanner<R> {
    reader: R,
    target: Section,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> SectionScanner<R> {
    pub fn new(reader: R, target: Section) -> Self {
        Self {
            reader,
            target,
            line_number: 0,
            done: false,
        }
    }

    pub fn target(&self) -> Section {
        self.target
    }
}

impl<R: BufRead> Iterator for SectionScanner<R> {
    type Item = Result<ScannedLine, SectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.line_number += 1;

        let mut text = String::new();
        match self.reader.read_line(&mut text) {
            Ok(0) => {
                self.done = true;
                Some(Ok(ScannedLine {
                    number: self.line_number,
                    class: LineClass::Break,
                    text,
                }))
            }
            Ok(_) => {
                let class = classify_line(&text, self.target);
                Some(Ok(ScannedLine {
                    number: self.line_number,
                    class,
                    text,
                }))
            }
            Err(source) => {
                self.done = true;
                Some(Err(SectionError::Read {
                    line: self.line_number,
                    source,
                }))
            }
        }
    }
}
