//! `raob-inversions` library crate.
//!
//! The binary (`raob`) is a thin wrapper around this library so that:
//!
//! - parsing and detection are testable without network or terminal
//! - every front-end (text, SVG, export, TUI) shares one pipeline
//!
//! Pipeline: [`data`] fetches the report, [`io::report`] parses it,
//! [`math`] converts units, [`analysis`] flags inversions, and [`report`],
//! [`plot`], [`io::export`] and [`tui`] present the result.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;

#[cfg(test)]
mod test_data;
