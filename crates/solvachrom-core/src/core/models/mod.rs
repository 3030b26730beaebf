//! # Core Models Module
//!
//! Data structures produced by the readers and consumed by the descriptor backends.
//!
//! - [`atom`] - Individual atom identity (symbol, names, serial and molecule ids)
//! - [`molecule`] - Atoms plus one or more coordinate frames, charge and multiplicity
//! - [`bead`] - Weighted groupings of atoms used to aggregate per-atom quantities

pub mod atom;
pub mod bead;
pub mod molecule;
