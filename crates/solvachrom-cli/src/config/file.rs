use crate::error::{CliError, Result};
use serde::Deserialize;
use solvachrom::core::io::section::Section;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileMoleculeConfig {
    pub charge: Option<i32>,
    pub multiplicity: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileDescriptorConfig {
    pub dielectric: Option<f64>,
    pub variances: Option<bool>,
    pub features: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileInputConfig {
    #[serde(rename = "bead-section")]
    pub bead_section: Option<Section>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileClassifierConfig {
    /// Program and arguments of the external classifier.
    pub command: Option<Vec<String>>,
}

/// Contents of a TOML configuration file; every table and key is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub molecule: Option<FileMoleculeConfig>,
    pub descriptors: Option<FileDescriptorConfig>,
    pub input: Option<FileInputConfig>,
    pub classifier: Option<FileClassifierConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_table() {
        let config = FileConfig::from_toml(
            r#"
            [molecule]
            charge = -1
            multiplicity = 2

            [descriptors]
            dielectric = 4.8
            variances = false
            features = ["homolumogap", "sasa"]

            [input]
            bead-section = "FEATURES"

            [classifier]
            command = ["python3", "xgb_predict.py", "--model", "xgbmodel1.json"]
            "#,
        )
        .unwrap();

        let molecule = config.molecule.unwrap();
        assert_eq!(molecule.charge, Some(-1));
        assert_eq!(molecule.multiplicity, Some(2));
        let descriptors = config.descriptors.unwrap();
        assert_eq!(descriptors.dielectric, Some(4.8));
        assert_eq!(descriptors.variances, Some(false));
        assert_eq!(
            descriptors.features,
            Some(vec!["homolumogap".to_string(), "sasa".to_string()])
        );
        assert_eq!(config.input.unwrap().bead_section, Some(Section::Features));
        let command = config.classifier.unwrap().command.unwrap();
        assert_eq!(command[0], "python3");
        assert_eq!(command.len(), 4);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert!(config.molecule.is_none());
        assert!(config.descriptors.is_none());
        assert!(config.input.is_none());
        assert!(config.classifier.is_none());
    }

    #[test]
    fn unknown_keys_and_sections_are_rejected() {
        assert!(FileConfig::from_toml("[molecule]\nspin = 1\n").is_err());
        assert!(FileConfig::from_toml("[input]\nbead-section = \"beads\"\n").is_err());
        assert!(FileConfig::from_toml("[descriptors]\nfractional-occupation = true\n").is_err());
    }
}
