use super::load_molecule;
use crate::cli::InspectArgs;
use crate::config::{AppConfig, CliOverrides};
use crate::error::{CliError, Result};
use solvachrom::core::diagnostics::Diagnostics;
use solvachrom::core::io::format::Format;
use solvachrom::core::io::input::read_beads;
use solvachrom::core::models::bead::Bead;
use solvachrom::core::models::molecule::Molecule;
use tracing::info;

pub fn run(args: InspectArgs, diagnostics: &Diagnostics) -> Result<()> {
    let config = AppConfig::load(args.molecule.config.as_deref(), &CliOverrides::from(&args))?;

    let (geometry, mut molecule) = load_molecule(&args.molecule.geometry, diagnostics)?;
    let format = Format::from_path(&geometry);
    molecule.set_charge(config.prediction.charge);
    molecule.set_multiplicity(config.prediction.multiplicity);

    let beads = match &args.bead_file {
        Some(path) => {
            info!(
                "Reading beads from the {} section of {:?}.",
                config.bead_section, path
            );
            let beads = read_beads(path, config.bead_section)?;
            check_bead_indexes(&beads, &molecule)?;
            beads
        }
        None => vec![Bead::whole_molecule(molecule.len())],
    };

    println!("{} ({} format)", geometry.display(), format);
    println!(
        "  atoms: {}, residues: {}, frames: {}",
        molecule.len(),
        molecule.residue_count(),
        molecule.frame_count()
    );
    println!(
        "  charge: {}, multiplicity: {}",
        molecule.charge(),
        molecule.multiplicity()
    );
    println!("  beads: {}", beads.len());
    for (i, bead) in beads.iter().enumerate() {
        println!(
            "    {:>3}: {} atom(s), total weight {:.3}",
            i + 1,
            bead.len(),
            bead.total_weight()
        );
    }
    println!(
        "  feature order (dielectric {}): {}",
        config.prediction.descriptors.dielectric,
        config.prediction.feature_keys.join(", ")
    );
    Ok(())
}

fn check_bead_indexes(beads: &[Bead], molecule: &Molecule) -> Result<()> {
    for (i, bead) in beads.iter().enumerate() {
        if let Some(&index) = bead.indexes().iter().find(|&&idx| idx >= molecule.len()) {
            return Err(CliError::Argument(format!(
                "bead {} refers to atom {}, but the molecule has {} atom(s)",
                i + 1,
                index + 1,
                molecule.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    fn args(argv: &[&str]) -> InspectArgs {
        match Cli::parse_from(argv).command {
            Commands::Inspect(args) => args,
            other => panic!("Expected 'inspect' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn inspects_ligpargen_file_and_collects_warning() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = dir.path().join("dye.pdb");
        fs::write(
            &pdb,
            "REMARK LIGPARGEN GENERATED PDB\nATOM 1 C00 UNK ? 0.0 0.0 0.0\nATOM 2 O01 UNK 1 1.2 0.0 0.0\n",
        )
        .unwrap();

        let diagnostics = Diagnostics::new();
        let argv = ["solvachrom", "inspect", pdb.to_str().unwrap()];
        run(args(&argv), &diagnostics).unwrap();
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn bead_file_with_out_of_range_atom_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let xyz = dir.path().join("co.xyz");
        fs::write(&xyz, "2\n\nC 0 0 0\nO 1.1 0 0\n").unwrap();
        let beads = dir.path().join("beads.inp");
        fs::write(&beads, "BEADS\n1 1,2\n2 3\n").unwrap();

        let diagnostics = Diagnostics::new();
        let argv = [
            "solvachrom",
            "inspect",
            xyz.to_str().unwrap(),
            "--beads",
            beads.to_str().unwrap(),
        ];
        let err = run(args(&argv), &diagnostics).unwrap_err();
        assert!(matches!(err, CliError::Argument(msg) if msg.contains("atom 3")));
    }

    #[test]
    fn missing_geometry_is_a_read_error() {
        let diagnostics = Diagnostics::new();
        let argv = ["solvachrom", "inspect", "/no/such/dye.gro"];
        assert!(matches!(
            run(args(&argv), &diagnostics),
            Err(CliError::Read(_))
        ));
    }
}
