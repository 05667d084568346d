//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed report rows (`SoundingRecord`) and the immutable `SoundingProfile`
//! - unit-normalized rows (`NormalizedRecord`)
//! - the fixed height bands (`HeightBand`) and per-band detector output
//! - the run configuration derived from the CLI (`RunConfig`)

pub mod bands;
pub mod types;

pub use bands::*;
pub use types::*;
