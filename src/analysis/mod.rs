//! Sounding analysis.

pub mod inversion;

pub use inversion::*;
