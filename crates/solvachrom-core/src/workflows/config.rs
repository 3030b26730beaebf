use std::collections::HashSet;
use thiserror::Error;

/// Relative permittivity of the implicit solvent used for electronic descriptors (water).
pub const DEFAULT_DIELECTRIC: f64 = 80.0;

/// Feature columns the bundled classifier was trained on, in training order.
pub const DEFAULT_FEATURE_KEYS: [&str; 21] = [
    "fukui+var",
    "c6",
    "c6var",
    "charge",
    "chargevar",
    "dipolenorm",
    "dipolex",
    "dipoley",
    "dipolez",
    "elongation",
    "fod",
    "fodvar",
    "fukui+",
    "fukui-",
    "fukui-var",
    "fukui0",
    "fukui0var",
    "hardness",
    "homolumogap",
    "planarity",
    "sasa",
];

/// Name suffix of the per-bead variance features (`c6var`, `fukui+var`, ...).
pub const VARIANCE_SUFFIX: &str = "var";

pub fn is_variance_feature(name: &str) -> bool {
    name.ends_with(VARIANCE_SUFFIX)
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

/// Options forwarded to every descriptor backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorOptions {
    pub dielectric: f64,
    /// Also compute the per-bead variance features (`*var`).
    pub variances: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    pub charge: i32,
    pub multiplicity: u32,
    pub descriptors: DescriptorOptions,
    /// Column order of the feature vector handed to the classifier.
    pub feature_keys: Vec<String>,
}

#[derive(Default)]
pub struct PredictionConfigBuilder {
    charge: Option<i32>,
    multiplicity: Option<u32>,
    dielectric: Option<f64>,
    variances: Option<bool>,
    feature_keys: Option<Vec<String>>,
}

impl PredictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charge(mut self, charge: i32) -> Self {
        self.charge = Some(charge);
        self
    }
    pub fn multiplicity(mut self, multiplicity: u32) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }
    pub fn dielectric(mut self, dielectric: f64) -> Self {
        self.dielectric = Some(dielectric);
        self
    }
    pub fn variances(mut self, enabled: bool) -> Self {
        self.variances = Some(enabled);
        self
    }
    pub fn feature_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the configuration.
    ///
    /// Charge defaults to 0 and multiplicity to 1; variances are on unless set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] if the dielectric or the feature keys were
    /// never set, and [`ConfigError::Invalid`] for a non-positive dielectric, a zero
    /// multiplicity, an empty or repeated feature key list, or a variance feature requested
    /// while variances are off.
    pub fn build(self) -> Result<PredictionConfig, ConfigError> {
        let dielectric = self
            .dielectric
            .ok_or(ConfigError::MissingParameter("dielectric"))?;
        if !dielectric.is_finite() || dielectric <= 0.0 {
            return Err(ConfigError::Invalid {
                parameter: "dielectric",
                reason: format!("must be a positive number, got {dielectric}"),
            });
        }

        let multiplicity = self.multiplicity.unwrap_or(1);
        if multiplicity == 0 {
            return Err(ConfigError::Invalid {
                parameter: "multiplicity",
                reason: "must be at least 1".to_string(),
            });
        }

        let feature_keys = self
            .feature_keys
            .ok_or(ConfigError::MissingParameter("feature_keys"))?;
        if feature_keys.is_empty() {
            return Err(ConfigError::Invalid {
                parameter: "feature_keys",
                reason: "at least one feature is required".to_string(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = feature_keys.iter().find(|k| !seen.insert(k.as_str())) {
            return Err(ConfigError::Invalid {
                parameter: "feature_keys",
                reason: format!("'{dup}' is listed more than once"),
            });
        }

        let variances = self.variances.unwrap_or(true);
        if !variances {
            if let Some(key) = feature_keys.iter().find(|k| is_variance_feature(k)) {
                return Err(ConfigError::Invalid {
                    parameter: "feature_keys",
                    reason: format!("'{key}' is a variance feature, but variances are disabled"),
                });
            }
        }

        Ok(PredictionConfig {
            charge: self.charge.unwrap_or(0),
            multiplicity,
            descriptors: DescriptorOptions {
                dielectric,
                variances,
            },
            feature_keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> PredictionConfigBuilder {
        PredictionConfigBuilder::new()
            .dielectric(DEFAULT_DIELECTRIC)
            .feature_keys(DEFAULT_FEATURE_KEYS)
    }

    #[test]
    fn build_applies_defaults() {
        let config = complete().build().unwrap();
        assert_eq!(config.charge, 0);
        assert_eq!(config.multiplicity, 1);
        assert_eq!(config.descriptors.dielectric, 80.0);
        assert!(config.descriptors.variances);
        assert_eq!(config.feature_keys.len(), 21);
        assert_eq!(config.feature_keys[0], "fukui+var");
        assert_eq!(config.feature_keys[20], "sasa");
    }

    #[test]
    fn build_keeps_explicit_values() {
        let config = complete()
            .charge(-1)
            .multiplicity(2)
            .variances(false)
            .feature_keys(["c6", "sasa"])
            .build()
            .unwrap();
        assert_eq!(config.charge, -1);
        assert_eq!(config.multiplicity, 2);
        assert!(!config.descriptors.variances);
    }

    #[test]
    fn variance_keys_need_variances() {
        let err = complete().variances(false).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                parameter: "feature_keys",
                reason: "'fukui+var' is a variance feature, but variances are disabled".to_string(),
            }
        );
        assert!(is_variance_feature("c6var"));
        assert!(!is_variance_feature("fukui+"));
    }

    #[test]
    fn build_fails_on_missing_parameters() {
        assert_eq!(
            PredictionConfigBuilder::new()
                .feature_keys(["c6"])
                .build()
                .unwrap_err(),
            ConfigError::MissingParameter("dielectric")
        );
        assert_eq!(
            PredictionConfigBuilder::new()
                .dielectric(4.0)
                .build()
                .unwrap_err(),
            ConfigError::MissingParameter("feature_keys")
        );
    }

    #[test]
    fn build_rejects_invalid_values() {
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                complete().dielectric(bad).build(),
                Err(ConfigError::Invalid { parameter: "dielectric", .. })
            ));
        }
        assert!(matches!(
            complete().multiplicity(0).build(),
            Err(ConfigError::Invalid { parameter: "multiplicity", .. })
        ));
        assert!(matches!(
            complete().feature_keys(Vec::<String>::new()).build(),
            Err(ConfigError::Invalid { parameter: "feature_keys", .. })
        ));
        let err = complete().feature_keys(["c6", "sasa", "c6"]).build().unwrap_err();
        assert!(err.to_string().contains("'c6'"));
    }
}
