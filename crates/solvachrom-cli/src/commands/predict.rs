use super::load_molecule;
use crate::cli::PredictArgs;
use crate::config::{AppConfig, CliOverrides};
use crate::error::{CliError, Result};
use solvachrom::core::diagnostics::Diagnostics;
use solvachrom::workflows::external::{
    CommandClassifier, DescriptorCommand, DescriptorTable, ExternalCommand,
};
use solvachrom::workflows::predict::{
    self, DescriptorBackend, Prediction, SolvatochromismClass,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub fn run(args: PredictArgs, verbosity: u8, diagnostics: &Diagnostics) -> Result<()> {
    let config = AppConfig::load(args.molecule.config.as_deref(), &CliOverrides::from(&args))?;

    let classifier = config
        .classifier
        .clone()
        .and_then(ExternalCommand::from_argv)
        .map(CommandClassifier::new)
        .ok_or_else(|| {
            CliError::Config(
                "no classifier program given; use --classifier or `[classifier] command`".into(),
            )
        })?;
    let backends = build_backends(&args)?;

    let (geometry, molecule) = load_molecule(&args.molecule.geometry, diagnostics)?;
    info!(
        "Predicting solvatochromism of {:?} with {} descriptor source(s).",
        geometry,
        backends.len()
    );
    let backend_refs: Vec<&dyn DescriptorBackend> = backends.iter().map(|b| b.as_ref()).collect();
    let prediction = predict::run(&molecule, &config.prediction, &backend_refs, &classifier)?;

    if let Some(path) = &args.features_out {
        info!("Writing the feature vector to {:?}.", path);
        let writer = BufWriter::new(File::create(path)?);
        prediction
            .descriptors
            .write_csv(writer, &config.prediction.feature_keys)?;
    }

    report(&mut std::io::stdout().lock(), &geometry, &prediction, verbosity)?;
    Ok(())
}

/// Descriptor tables first, then descriptor programs, in command-line order.
fn build_backends(args: &PredictArgs) -> Result<Vec<Box<dyn DescriptorBackend>>> {
    let mut backends: Vec<Box<dyn DescriptorBackend>> = Vec::new();
    for path in &args.descriptor_tables {
        backends.push(Box::new(DescriptorTable::new(path)));
    }
    for line in &args.descriptor_commands {
        let command = ExternalCommand::from_argv(line.split_whitespace())
            .ok_or_else(|| CliError::Argument("--descriptor-command is empty".into()))?;
        backends.push(Box::new(DescriptorCommand::new(command)));
    }
    if backends.is_empty() {
        return Err(CliError::Argument(
            "no descriptor source given; use --descriptors or --descriptor-command".into(),
        ));
    }
    Ok(backends)
}

/// Prints the predicted class, and from `-vv` on the class probabilities.
fn report<W: Write>(
    out: &mut W,
    geometry: &Path,
    prediction: &Prediction,
    verbosity: u8,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} is predicted to display {} solvatochromism",
        geometry.display(),
        prediction.class
    )?;
    if verbosity >= 2 {
        writeln!(out, "Probabilities:")?;
        writeln!(
            out,
            "positive/inverted: {:.5}, positive/negative: {:.5} inverted/negative: {:.5}",
            prediction.probability(SolvatochromismClass::Positive),
            prediction.probability(SolvatochromismClass::Inverted),
            prediction.probability(SolvatochromismClass::Negative)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use solvachrom::core::features::FeatureMap;
    use std::fs;
    use std::path::PathBuf;

    fn args(argv: &[&str]) -> PredictArgs {
        match Cli::parse_from(argv).command {
            Commands::Predict(args) => args,
            other => panic!("Expected 'predict' subcommand, got {other:?}"),
        }
    }

    fn prediction() -> Prediction {
        Prediction {
            class: SolvatochromismClass::Inverted,
            probabilities: [0.125, 0.625, 0.25],
            features: vec![1.0],
            descriptors: FeatureMap::new(),
        }
    }

    #[test]
    fn report_prints_class_line() {
        let mut out = Vec::new();
        report(&mut out, Path::new("dye.pdb"), &prediction(), 1).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "dye.pdb is predicted to display Inverted solvatochromism\n"
        );
    }

    #[test]
    fn report_adds_probabilities_at_debug_verbosity() {
        let mut out = Vec::new();
        report(&mut out, Path::new("dye.pdb"), &prediction(), 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Probabilities:");
        assert_eq!(
            lines[2],
            "positive/inverted: 0.25000, positive/negative: 0.62500 inverted/negative: 0.12500"
        );
    }

    #[test]
    fn prediction_needs_a_descriptor_source() {
        let diagnostics = Diagnostics::new();
        let argv = ["solvachrom", "predict", "dye.xyz", "--classifier", "model"];
        let err = run(args(&argv), 0, &diagnostics).unwrap_err();
        assert!(matches!(err, CliError::Argument(msg) if msg.contains("--descriptors")));
    }

    #[test]
    fn prediction_needs_a_classifier() {
        let diagnostics = Diagnostics::new();
        let argv = ["solvachrom", "predict", "dye.xyz", "-d", "xtb.csv"];
        let err = run(args(&argv), 0, &diagnostics).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("--classifier")));
    }

    #[cfg(unix)]
    #[test]
    fn predicts_from_table_and_writes_features() {
        let dir = tempfile::tempdir().unwrap();
        let xyz = dir.path().join("co.xyz");
        fs::write(&xyz, "2\n\nC 0 0 0\nO 1.1 0 0\n").unwrap();
        let table = dir.path().join("descriptors.csv");
        fs::write(&table, "sasa,c6,c6var\n120.5,14.2,0.3\n").unwrap();
        let config = dir.path().join("run.toml");
        fs::write(
            &config,
            r#"
            [descriptors]
            features = ["c6", "sasa", "c6var"]

            [classifier]
            command = ["sh", "-c", "cat > /dev/null; echo 0.7,0.2,0.1"]
            "#,
        )
        .unwrap();
        let features_out: PathBuf = dir.path().join("features.csv");

        let diagnostics = Diagnostics::new();
        let argv = [
            "solvachrom",
            "predict",
            xyz.to_str().unwrap(),
            "-C",
            config.to_str().unwrap(),
            "-d",
            table.to_str().unwrap(),
            "--features-out",
            features_out.to_str().unwrap(),
        ];
        run(args(&argv), 2, &diagnostics).unwrap();

        assert_eq!(
            fs::read_to_string(&features_out).unwrap(),
            "c6,sasa,c6var\n14.2,120.5,0.3\n"
        );
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn classifier_failure_fails_the_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let xyz = dir.path().join("co.xyz");
        fs::write(&xyz, "2\n\nC 0 0 0\nO 1.1 0 0\n").unwrap();
        let table = dir.path().join("descriptors.csv");
        fs::write(&table, "c6\n14.2\n").unwrap();
        let config = dir.path().join("run.toml");
        fs::write(
            &config,
            "[descriptors]\nfeatures = [\"c6\"]\n[classifier]\ncommand = [\"false\"]\n",
        )
        .unwrap();

        let diagnostics = Diagnostics::new();
        let argv = [
            "solvachrom",
            "predict",
            xyz.to_str().unwrap(),
            "-C",
            config.to_str().unwrap(),
            "-d",
            table.to_str().unwrap(),
        ];
        let err = run(args(&argv), 0, &diagnostics).unwrap_err();
        assert!(matches!(err, CliError::Predict(_)));
    }
}
