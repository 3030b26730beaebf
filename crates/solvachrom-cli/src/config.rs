pub mod defaults;
pub mod file;

use crate::cli::{InputArgs, InspectArgs, MoleculeArgs, PredictArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use file::FileConfig;
use solvachrom::core::io::section::Section;
use solvachrom::workflows::config::{PredictionConfig, PredictionConfigBuilder};
use std::path::Path;
use tracing::debug;

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub charge: Option<i32>,
    pub multiplicity: Option<u32>,
    pub bead_section: Option<Section>,
    pub classifier: Option<Vec<String>>,
}

impl From<&MoleculeArgs> for CliOverrides {
    fn from(args: &MoleculeArgs) -> Self {
        Self {
            charge: args.charge,
            multiplicity: args.multiplicity,
            ..Self::default()
        }
    }
}

impl From<&InspectArgs> for CliOverrides {
    fn from(args: &InspectArgs) -> Self {
        Self {
            bead_section: args.bead_section,
            ..Self::from(&args.molecule)
        }
    }
}

impl From<&PredictArgs> for CliOverrides {
    fn from(args: &PredictArgs) -> Self {
        Self {
            classifier: args
                .classifier
                .as_deref()
                .map(|command| command.split_whitespace().map(String::from).collect()),
            ..Self::from(&args.molecule)
        }
    }
}

impl From<&InputArgs> for CliOverrides {
    fn from(args: &InputArgs) -> Self {
        Self {
            bead_section: args.bead_section,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bead_section: Section,
    pub prediction: PredictionConfig,
    /// Classifier program followed by its arguments, if one was configured.
    pub classifier: Option<Vec<String>>,
}

impl AppConfig {
    /// Resolves the final configuration: CLI flag, then config file, then built-in default.
    pub fn load(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let file_config = match config_path {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::merge(file_config, overrides, &DefaultsConfig::default())
    }

    fn merge(
        file_config: FileConfig,
        overrides: &CliOverrides,
        defaults: &DefaultsConfig,
    ) -> Result<Self> {
        let molecule = file_config.molecule.unwrap_or_default();
        let descriptors = file_config.descriptors.unwrap_or_default();
        let input = file_config.input.unwrap_or_default();
        let classifier = file_config.classifier.unwrap_or_default();

        let bead_section = overrides
            .bead_section
            .or(input.bead_section)
            .unwrap_or(defaults.bead_section);

        let prediction = PredictionConfigBuilder::new()
            .charge(overrides.charge.or(molecule.charge).unwrap_or(defaults.charge))
            .multiplicity(
                overrides
                    .multiplicity
                    .or(molecule.multiplicity)
                    .unwrap_or(defaults.multiplicity),
            )
            .dielectric(descriptors.dielectric.unwrap_or(defaults.dielectric))
            .variances(descriptors.variances.unwrap_or(defaults.variances))
            .feature_keys(
                descriptors
                    .features
                    .unwrap_or_else(|| defaults.features.clone()),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let classifier = overrides
            .classifier
            .clone()
            .or(classifier.command)
            .filter(|argv| !argv.is_empty());

        debug!(
            "Resolved configuration: bead section {}, classifier {:?}, {:?}",
            bead_section, classifier, prediction
        );
        Ok(Self {
            bead_section,
            prediction,
            classifier,
        })
    }
}
