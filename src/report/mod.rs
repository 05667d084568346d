//! Terminal reporting: run summary, band flags and the sounding table.

pub mod format;

pub use format::*;
