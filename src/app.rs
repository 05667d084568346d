//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - runs the fetch/parse/detect pipeline once
//! - hands the finished run to the chosen front-end (text, SVG, export, TUI)

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ExportArgs, PlotArgs, ShowArgs, SoundingArgs};
use crate::domain::{PreambleRule, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `raob` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.command.sounding_args().verbose);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Plot(args) => handle_plot(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from `warn`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.sounding);
    let run = pipeline::run_analysis(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(run.profile.header(), run.profile.len())
    );
    println!("{}", crate::report::format_bands(&run.inversions));

    if !args.no_plot {
        let chart = crate::plot::profile_chart(&run.levels, &run.inversions);
        println!(
            "{}",
            crate::plot::render_ascii_profile(&chart, args.width, args.height)
        );
    }

    println!("{}", crate::report::format_table(&run.levels));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.sounding);
    let run = pipeline::run_analysis(&config)?;

    for path in crate::plot::write_svg_charts(&run, &args.out_dir)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.csv.is_none() && args.json.is_none() {
        return Err(AppError::new(2, "Nothing to export: pass --csv and/or --json"));
    }

    let config = run_config_from_args(&args.sounding);
    let run = pipeline::run_analysis(&config)?;

    if let Some(path) = &args.csv {
        crate::io::export::write_table_csv(path, &run.levels)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.json {
        crate::io::export::write_analysis_json(path, &run)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_tui(args: SoundingArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;
    crate::tui::run(run)
}

pub fn run_config_from_args(args: &SoundingArgs) -> RunConfig {
    RunConfig {
        input: args.input.clone(),
        preamble: match (args.preamble_bytes, args.legacy_preamble) {
            (Some(n), _) => PreambleRule::Fixed(n),
            (None, true) => PreambleRule::legacy(),
            (None, false) => PreambleRule::DataLines,
        },
        scope: args.scope,
    }
}

/// Rewrite argv so `raob` defaults to `raob show`.
///
/// Rules:
/// - `raob`                       -> `raob show`
/// - `raob --input x.txt ...`     -> `raob show --input x.txt ...`
/// - `raob --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("show".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "plot" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // A leading flag means "show flags".
    if arg1.starts_with('-') {
        argv.insert(1, "show".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LEGACY_PREAMBLE_LEN, MinimumScope};

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_show() {
        assert_eq!(rewrite_args(argv(&["raob"])), argv(&["raob", "show"]));
        assert_eq!(
            rewrite_args(argv(&["raob", "--scope", "band"])),
            argv(&["raob", "show", "--scope", "band"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["raob", "tui"])), argv(&["raob", "tui"]));
        assert_eq!(rewrite_args(argv(&["raob", "--help"])), argv(&["raob", "--help"]));
    }

    #[test]
    fn preamble_bytes_select_fixed_rule() {
        let args = SoundingArgs {
            preamble_bytes: Some(408),
            scope: MinimumScope::Band,
            ..SoundingArgs::default()
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.preamble, PreambleRule::Fixed(408));
        assert_eq!(config.scope, MinimumScope::Band);

        let config = run_config_from_args(&SoundingArgs::default());
        assert_eq!(config.preamble, PreambleRule::DataLines);
    }

    #[test]
    fn legacy_flag_uses_the_historical_offset() {
        let args = SoundingArgs {
            legacy_preamble: true,
            ..SoundingArgs::default()
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.preamble, PreambleRule::Fixed(LEGACY_PREAMBLE_LEN));
    }
}
