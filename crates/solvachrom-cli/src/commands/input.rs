use crate::cli::InputArgs;
use crate::config::{AppConfig, CliOverrides};
use crate::error::Result;
use solvachrom::core::io::input::{InputFile, read_beads, read_features};
use solvachrom::core::io::section::Section;
use std::path::Path;
use tracing::info;

pub fn run(args: InputArgs) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref(), &CliOverrides::from(&args))?;
    let input = read_input(&args.input, config.bead_section)?;

    println!("{}", args.input.display());
    println!("  beads ({} section): {}", config.bead_section, input.beads.len());
    for (i, bead) in input.beads.iter().enumerate() {
        let atoms: Vec<String> = bead
            .iter()
            .map(|(index, weight)| {
                if weight == 1.0 {
                    format!("{}", index + 1)
                } else {
                    format!("{}({:.3})", index + 1, weight)
                }
            })
            .collect();
        println!("    {:>3}: {}", i + 1, atoms.join(", "));
    }
    println!("  features: {}", input.features.join(", "));
    Ok(())
}

/// Runs the bead and feature passes in parallel, each over its own file handle.
fn read_input(path: &Path, bead_section: Section) -> Result<InputFile> {
    info!(
        "Reading beads ({} section) and features from {:?}.",
        bead_section, path
    );
    let (beads, features) = rayon::join(
        || read_beads(path, bead_section),
        || read_features(path),
    );
    Ok(InputFile {
        beads: beads?,
        features: features?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;

    const INPUT: &str = "\
# dye beads
BEADS
1 1,2,3/2
2 3/2,4
BONDS
1 1 2
FEATURES
1 homolumogap
2 sasa
";

    #[test]
    fn passes_agree_with_sequential_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dye.inp");
        fs::write(&path, INPUT).unwrap();

        let parallel = read_input(&path, Section::Beads).unwrap();
        let sequential = InputFile::read(&path, Section::Beads).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.beads.len(), 2);
        assert_eq!(parallel.beads[0].weights(), &[1.0, 1.0, 0.5]);
        assert_eq!(parallel.features, vec!["homolumogap", "sasa"]);
    }

    #[test]
    fn historical_feature_section_as_bead_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.inp");
        fs::write(&path, "FEATURES\n1 2,4/2\n").unwrap();

        let input = read_input(&path, Section::Features).unwrap();
        assert_eq!(input.beads.len(), 1);
        assert_eq!(input.beads[0].indexes(), &[1, 3]);
        assert_eq!(input.features, vec!["2,4/2"]);
    }

    #[test]
    fn bad_token_fails_the_whole_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.inp");
        fs::write(&path, "BEADS\n1 1,x\nFEATURES\n1 sasa\n").unwrap();
        assert!(matches!(
            read_input(&path, Section::Beads),
            Err(CliError::Input(_))
        ));
    }
}
