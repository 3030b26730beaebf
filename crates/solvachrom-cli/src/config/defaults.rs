use solvachrom::core::io::section::Section;
use solvachrom::workflows::config::{DEFAULT_DIELECTRIC, DEFAULT_FEATURE_KEYS};

pub struct DefaultsConfig {
    pub charge: i32,
    pub multiplicity: u32,
    pub dielectric: f64,
    pub variances: bool,
    pub features: Vec<String>,
    pub bead_section: Section,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            charge: 0,
            multiplicity: 1,
            dielectric: DEFAULT_DIELECTRIC,
            variances: true,
            features: DEFAULT_FEATURE_KEYS.iter().map(|k| k.to_string()).collect(),
            bead_section: Section::Beads,
        }
    }
}
