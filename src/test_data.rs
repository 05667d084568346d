//! Shared fixtures for unit tests.

/// A saved Albany report: header plus 37 records reaching 16 km.
pub const SAMPLE_REPORT: &str = include_str!("../tests/data/alb_latest.txt");
