//! Numeric helpers: unit conversions and the profile normalizer.

pub mod units;

pub use units::*;
