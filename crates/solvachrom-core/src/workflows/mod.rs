//! # Workflows Module
//!
//! High-level entry points that turn a parsed molecule into a solvatochromism prediction.
//!
//! ## Overview
//!
//! The numerical work is not done here. Descriptor backends (electronic structure, shape,
//! solvent-accessible surface) and the trained classifier are plugged in through the
//! [`predict::DescriptorBackend`] and [`predict::Classifier`] traits; the workflow builds the
//! beads, joins the backends' feature maps, orders the feature vector, and interprets the
//! classifier output.
//!
//! - **Configuration** ([`config`]) - Validated prediction parameters and their defaults
//! - **Prediction** ([`predict`]) - The whole-molecule prediction pipeline
//! - **External collaborators** ([`external`]) - Descriptor tables and programs, and a
//!   classifier program, behind the pipeline's traits

pub mod config;
pub mod external;
pub mod predict;
