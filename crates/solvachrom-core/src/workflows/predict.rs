use super::config::{DescriptorOptions, PredictionConfig};
use crate::core::features::{FeatureError, FeatureMap};
use crate::core::models::bead::Bead;
use crate::core::models::molecule::Molecule;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Cannot compute descriptors for a molecule without atoms")]
    EmptyMolecule,

    #[error("Descriptor backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },

    #[error("Feature assembly failed: {0}")]
    Feature(#[from] FeatureError),

    #[error("Classifier failed: {0}")]
    Classifier(String),

    #[error("Classifier returned {found} probabilities, expected {expected}")]
    ProbabilityCount { expected: usize, found: usize },

    #[error("Classifier returned unknown class index {0}")]
    UnknownClass(usize),
}

/// The kind of solvatochromism a dye is predicted to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolvatochromismClass {
    Negative = 0,
    Inverted = 1,
    Positive = 2,
}

impl SolvatochromismClass {
    pub const ALL: [SolvatochromismClass; 3] = [
        SolvatochromismClass::Negative,
        SolvatochromismClass::Inverted,
        SolvatochromismClass::Positive,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for SolvatochromismClass {
    type Error = PredictError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(PredictError::UnknownClass(index))
    }
}

impl fmt::Display for SolvatochromismClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolvatochromismClass::Negative => "Negative",
            SolvatochromismClass::Inverted => "Inverted",
            SolvatochromismClass::Positive => "Positive",
        };
        f.write_str(name)
    }
}

/// A source of per-bead descriptors (electronic structure, shape, surface area, ...).
pub trait DescriptorBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Computes this backend's features for every bead, using the first coordinate frame.
    fn compute(
        &self,
        molecule: &Molecule,
        beads: &[Bead],
        options: &DescriptorOptions,
    ) -> Result<FeatureMap, PredictError>;
}

/// A trained multi-class model over the ordered feature vector.
pub trait Classifier {
    /// One probability per [`SolvatochromismClass`], in class index order.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictError>;

    /// Index of the predicted class. Defaults to the most probable one.
    fn predict_class(&self, features: &[f64]) -> Result<usize, PredictError> {
        let probabilities = self.predict_proba(features)?;
        probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .ok_or(PredictError::ProbabilityCount {
                expected: SolvatochromismClass::ALL.len(),
                found: 0,
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: SolvatochromismClass,
    /// Indexed by [`SolvatochromismClass::index`].
    pub probabilities: [f64; 3],
    /// The feature vector the classifier saw, in `feature_keys` order.
    pub features: Vec<f64>,
    /// Every descriptor the backends produced, including ones the classifier did not use.
    pub descriptors: FeatureMap,
}

impl Prediction {
    pub fn probability(&self, class: SolvatochromismClass) -> f64 {
        self.probabilities[class.index()]
    }
}

/// Predicts the solvatochromism class of a whole molecule.
///
/// The molecule is treated as a single bead with every atom at full weight. Each backend
/// computes its features on a working copy carrying the configured charge and multiplicity;
/// the maps are joined in backend order (later backends win on shared names) and the bead's
/// vector is assembled in `config.feature_keys` order for the classifier.
///
/// # Errors
///
/// Returns [`PredictError`] if the molecule is empty, a backend fails, a configured feature
/// was not computed, or the classifier output is malformed.
#[instrument(skip_all, name = "prediction_workflow")]
pub fn run(
    molecule: &Molecule,
    config: &PredictionConfig,
    backends: &[&dyn DescriptorBackend],
    classifier: &dyn Classifier,
) -> Result<Prediction, PredictError> {
    if molecule.is_empty() {
        return Err(PredictError::EmptyMolecule);
    }

    let mut working = molecule.clone();
    working.set_charge(config.charge);
    working.set_multiplicity(config.multiplicity);
    let beads = [Bead::whole_molecule(working.len())];
    info!(
        "Computing descriptors for {} atom(s) with {} backend(s).",
        working.len(),
        backends.len()
    );

    let mut features = FeatureMap::new();
    for backend in backends {
        let map = backend.compute(&working, &beads, &config.descriptors)?;
        debug!("Backend '{}' produced {} feature(s).", backend.name(), map.len());
        features.join(map)?;
    }

    let vector = features.vector_for_bead(0, &config.feature_keys)?;
    let proba = classifier.predict_proba(&vector)?;
    let probabilities: [f64; 3] =
        proba
            .as_slice()
            .try_into()
            .map_err(|_| PredictError::ProbabilityCount {
                expected: SolvatochromismClass::ALL.len(),
                found: proba.len(),
            })?;
    debug!("Class probabilities: {:?}", probabilities);
    let class = SolvatochromismClass::try_from(classifier.predict_class(&vector)?)?;

    info!("Predicted {} solvatochromism.", class);
    Ok(Prediction {
        class,
        probabilities,
        features: vector,
        descriptors: features,
    })
}
