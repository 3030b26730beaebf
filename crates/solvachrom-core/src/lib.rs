//! # Solvachrom Core Library
//!
//! Parsing and data-structuring layer of a solvatochromism predictor. The heavy numerical work
//! (quantum-chemical descriptors, shape descriptors, SASA, model inference) is delegated to
//! external backends; this crate reads the inputs those backends need and hands them over in a
//! well-typed form.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Bead`), the sectioned
//!   bead-definition parser, the structure file readers (including the defensive reader for
//!   LigParGen output), the diagnostics context, and the feature map.
//!
//! - **[`workflows`]: The Public API.** The prediction pipeline that joins descriptor backends and
//!   a classifier behind traits, plus its configuration.

pub mod core;
pub mod workflows;
