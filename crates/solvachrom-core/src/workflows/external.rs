//! Descriptor backends and a classifier that live outside this process.
//!
//! Descriptors come from a precomputed CSV table or from an external program, and the trained
//! model is an external program too. Programs talk over standard streams:
//!
//! - a descriptor program reads an XYZ geometry on stdin, receives the charge, multiplicity and
//!   dielectric as arguments, and prints a descriptor table (header of feature names, one row
//!   per bead) on stdout;
//! - a classifier reads one comma-separated feature vector on stdin and prints one probability
//!   per class, in class index order.

use super::config::{DescriptorOptions, is_variance_feature};
use super::predict::{Classifier, DescriptorBackend, PredictError};
use crate::core::features::FeatureMap;
use crate::core::models::bead::Bead;
use crate::core::models::molecule::Molecule;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// An external program with its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Splits an argv-style list into program and arguments. Returns `None` if it is empty.
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next()?;
        Some(Self::new(program).args(argv))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the program with `extra` appended to its arguments and `input` on stdin.
    ///
    /// Returns stdout, or a message carrying the exit status and stderr if the program could
    /// not be started or did not succeed.
    fn run(&self, extra: &[String], input: &str) -> Result<String, String> {
        debug!("Running '{}' with arguments {:?} {:?}", self.program, self.args, extra);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(extra)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("cannot start '{}': {}", self.program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()) {
                // The program may exit without reading its input; its status decides.
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(format!("cannot write to '{}': {}", self.program, e));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| format!("'{}' did not finish: {}", self.program, e))?;
        if !output.status.success() {
            return Err(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| format!("'{}' printed non-UTF-8 output: {}", self.program, e))
    }
}

/// Precomputed descriptors read from a CSV file.
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    name: String,
    path: PathBuf,
}

impl DescriptorTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("table {}", path.display()),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DescriptorBackend for DescriptorTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        _molecule: &Molecule,
        beads: &[Bead],
        options: &DescriptorOptions,
    ) -> Result<FeatureMap, PredictError> {
        let file = File::open(&self.path)
            .map_err(|e| backend_error(self.name(), format!("cannot open file: {e}")))?;
        let map = FeatureMap::read_csv(BufReader::new(file))
            .map_err(|e| backend_error(self.name(), e.to_string()))?;
        finish(self.name(), map, beads, options)
    }
}

/// Descriptors computed by an external program for the current geometry.
///
/// The program is called as `<program> <args> --charge C --multiplicity M --dielectric D`, with
/// `--no-variances` added when variance features are not wanted.
#[derive(Debug, Clone)]
pub struct DescriptorCommand {
    command: ExternalCommand,
}

impl DescriptorCommand {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

impl DescriptorBackend for DescriptorCommand {
    fn name(&self) -> &str {
        self.command.program()
    }

    fn compute(
        &self,
        molecule: &Molecule,
        beads: &[Bead],
        options: &DescriptorOptions,
    ) -> Result<FeatureMap, PredictError> {
        let mut extra = vec![
            "--charge".to_string(),
            molecule.charge().to_string(),
            "--multiplicity".to_string(),
            molecule.multiplicity().to_string(),
            "--dielectric".to_string(),
            options.dielectric.to_string(),
        ];
        if !options.variances {
            extra.push("--no-variances".to_string());
        }

        let stdout = self
            .command
            .run(&extra, &to_xyz(molecule))
            .map_err(|message| backend_error(self.name(), message))?;
        let map = FeatureMap::read_csv(stdout.as_bytes())
            .map_err(|e| backend_error(self.name(), e.to_string()))?;
        finish(self.name(), map, beads, options)
    }
}

/// A trained model behind an external program.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    command: ExternalCommand,
}

impl CommandClassifier {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

impl Classifier for CommandClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictError> {
        let mut line = features
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        line.push('\n');
        let stdout = self
            .command
            .run(&[], &line)
            .map_err(PredictError::Classifier)?;
        parse_probabilities(&stdout)
    }
}

fn parse_probabilities(text: &str) -> Result<Vec<f64>, PredictError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse().map_err(|_| {
                PredictError::Classifier(format!("cannot read probability '{token}'"))
            })
        })
        .collect()
}

fn backend_error(backend: &str, message: impl Into<String>) -> PredictError {
    PredictError::Backend {
        backend: backend.to_string(),
        message: message.into(),
    }
}

/// Checks the row count and drops the variance features when they were not asked for.
fn finish(
    backend: &str,
    mut map: FeatureMap,
    beads: &[Bead],
    options: &DescriptorOptions,
) -> Result<FeatureMap, PredictError> {
    if map.bead_count() != beads.len() {
        return Err(backend_error(
            backend,
            format!(
                "descriptor table has {} row(s), expected one per bead ({})",
                map.bead_count(),
                beads.len()
            ),
        ));
    }
    if !options.variances {
        map.retain(|name| !is_variance_feature(name));
    }
    debug!("Backend '{}' provided {} feature(s).", backend, map.len());
    Ok(map)
}

/// First frame of `molecule` in XYZ format.
fn to_xyz(molecule: &Molecule) -> String {
    let mut out = format!(
        "{}\ncharge {} multiplicity {}\n",
        molecule.len(),
        molecule.charge(),
        molecule.multiplicity()
    );
    for (atom, p) in molecule.atoms().iter().zip(molecule.coords()) {
        let _ = writeln!(out, "{} {:.6} {:.6} {:.6}", atom.symbol, p.x, p.y, p.z);
    }
    out
}
