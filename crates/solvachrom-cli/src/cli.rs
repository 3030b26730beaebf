use clap::{Args, Parser, Subcommand};
use solvachrom::core::io::section::Section;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "Solvachrom CLI - Reads molecular geometries and bead definitions for solvatochromism prediction.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG and class probabilities, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel work.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the solvatochromism class of a molecule.
    Predict(PredictArgs),
    /// Read a geometry (.gro, .pdb, or XYZ) and show what the predictor would see.
    Inspect(InspectArgs),
    /// Parse the beads and features of a sectioned input file.
    Input(InputArgs),
}

/// Geometry and electronic state shared by the commands that read a molecule.
#[derive(Args, Debug)]
pub struct MoleculeArgs {
    /// Path to the geometry file. The reader is chosen by extension; unknown extensions are
    /// read as XYZ.
    #[arg(value_name = "GEOMETRY")]
    pub geometry: PathBuf,

    /// Charge of the molecule.
    #[arg(short, long, value_name = "INT", allow_hyphen_values = true)]
    pub charge: Option<i32>,

    /// Spin multiplicity of the molecule.
    #[arg(short, long, value_name = "INT")]
    pub multiplicity: Option<u32>,

    /// Path to a configuration file in TOML format.
    #[arg(short = 'C', long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub molecule: MoleculeArgs,

    /// CSV table of precomputed descriptors (header of feature names, one row). May be
    /// repeated; later tables win on shared features.
    #[arg(short = 'd', long = "descriptors", value_name = "PATH")]
    pub descriptor_tables: Vec<PathBuf>,

    /// Program that computes descriptors for the geometry, given as one quoted command line.
    /// May be repeated; runs after the tables.
    #[arg(long = "descriptor-command", value_name = "COMMAND")]
    pub descriptor_commands: Vec<String>,

    /// Classifier program, given as one quoted command line. Overrides `[classifier] command`.
    #[arg(long, value_name = "COMMAND")]
    pub classifier: Option<String>,

    /// Write the descriptors the classifier saw to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub features_out: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub molecule: MoleculeArgs,

    /// Sectioned input file with bead definitions. Without it, the whole molecule is one bead.
    #[arg(long = "beads", value_name = "PATH")]
    pub bead_file: Option<PathBuf>,

    /// Section holding the bead definitions (e.g. BEADS, FEATURES).
    #[arg(long, value_name = "KEYWORD")]
    pub bead_section: Option<Section>,
}

/// Arguments for the `input` subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to the sectioned input file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Section holding the bead definitions (e.g. BEADS, FEATURES).
    #[arg(long, value_name = "KEYWORD")]
    pub bead_section: Option<Section>,

    /// Path to a configuration file in TOML format.
    #[arg(short = 'C', long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_is_positional_and_short_flags_set_the_state() {
        let cli = Cli::try_parse_from(["solvachrom", "predict", "-c", "-1", "-m", "2", "dye.xyz"])
            .unwrap();
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.molecule.geometry, PathBuf::from("dye.xyz"));
                assert_eq!(args.molecule.charge, Some(-1));
                assert_eq!(args.molecule.multiplicity, Some(2));
                assert!(args.molecule.config.is_none());
            }
            other => panic!("Expected 'predict' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn config_file_uses_capital_short_flag() {
        let cli = Cli::try_parse_from(["solvachrom", "inspect", "-C", "run.toml", "dye.pdb"])
            .unwrap();
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.molecule.config, Some(PathBuf::from("run.toml")));
                assert_eq!(args.molecule.charge, None);
            }
            other => panic!("Expected 'inspect' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn predict_collects_repeated_backends() {
        let cli = Cli::try_parse_from([
            "solvachrom",
            "predict",
            "dye.gro",
            "-d",
            "xtb.csv",
            "--descriptors",
            "sasa.csv",
            "--descriptor-command",
            "shape-descriptors --fast",
            "--classifier",
            "python3 model.py",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.descriptor_tables.len(), 2);
                assert_eq!(args.descriptor_commands, vec!["shape-descriptors --fast"]);
                assert_eq!(args.classifier.as_deref(), Some("python3 model.py"));
            }
            other => panic!("Expected 'predict' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn missing_geometry_is_a_usage_error() {
        assert!(Cli::try_parse_from(["solvachrom", "predict", "-c", "0"]).is_err());
    }
}
