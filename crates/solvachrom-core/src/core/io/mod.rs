//! Provides input/output functionality for the predictor's input files.
//!
//! Two families of files are handled here. The sectioned bead-definition format
//! ([`section`], [`input`]) describes how atoms are grouped into beads and which descriptors
//! are requested. The structure readers ([`pdb`], [`gro`], [`xyz`], [`ligpargen`]) turn
//! coordinate files into a [`Molecule`](crate::core::models::molecule::Molecule), with
//! [`format`] choosing the reader from the file extension.

pub mod error;
pub mod format;
pub mod gro;
pub mod input;
pub mod ligpargen;
pub mod pdb;
pub mod section;
pub mod traits;
pub mod xyz;
