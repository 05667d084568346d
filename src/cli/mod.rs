//! Command-line parsing for the RAOB inversion tool.
//!
//! Argument parsing and command dispatch stay separate from parsing and
//! detection code; handlers in `app` turn these structs into a `RunConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::MinimumScope;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "raob",
    version,
    about = "Temperature inversions in the latest Albany (72518) RAOB sounding"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the run summary, band flags, an ASCII profile chart and the table.
    Show(ShowArgs),
    /// Write `profile.svg` and `raw.svg`.
    Plot(PlotArgs),
    /// Export the table to CSV and/or the analysis to JSON.
    Export(ExportArgs),
    /// Launch the interactive terminal view.
    ///
    /// The sounding is fetched once; the view never refetches.
    Tui(SoundingArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct SoundingArgs {
    /// Parse a saved report instead of fetching the latest one.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Skip exactly N bytes of header instead of detecting the first data line.
    #[arg(long, value_name = "N", conflicts_with = "legacy_preamble")]
    pub preamble_bytes: Option<usize>,

    /// Skip the historical fixed 408-byte header.
    #[arg(long)]
    pub legacy_preamble: bool,

    /// Where to search for a band's coldest temperature.
    #[arg(long, value_enum, default_value_t = MinimumScope::Prefix)]
    pub scope: MinimumScope,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub sounding: SoundingArgs,

    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 40)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub sounding: SoundingArgs,

    /// Directory receiving `profile.svg` and `raw.svg`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub sounding: SoundingArgs,

    /// Write the sounding table (native and derived fields) as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write header metadata and band flags as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

impl Command {
    pub fn sounding_args(&self) -> &SoundingArgs {
        match self {
            Command::Show(a) => &a.sounding,
            Command::Plot(a) => &a.sounding,
            Command::Export(a) => &a.sounding,
            Command::Tui(a) => a,
        }
    }
}
