use solvachrom::core::features::FeatureError;
use solvachrom::core::io::error::ReadError;
use solvachrom::core::io::input::InputError;
use solvachrom::workflows::predict::PredictError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Failed to read geometry input file: {0}")]
    Read(#[from] ReadError),

    #[error("Prediction failed: {0}")]
    Predict(#[from] PredictError),

    #[error("Failed to write features: {0}")]
    Features(#[from] FeatureError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
