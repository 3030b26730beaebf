//! # Core Module
//!
//! Fundamental building blocks shared by every workflow.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, coordinate frames, molecules, and beads
//! - **File I/O** ([`io`]) - The sectioned input format and the structure file readers
//! - **Diagnostics** ([`diagnostics`]) - Run-scoped collection of recoverable warnings
//! - **Descriptors** ([`features`]) - Named per-bead descriptor values and their ordering

pub mod diagnostics;
pub mod features;
pub mod io;
pub mod models;
