//! Core module
//!
//! Name recovery, manifest decoding and reconciliation.

pub mod filenames;
pub mod manifest;
pub mod reconcile;
