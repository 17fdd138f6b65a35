//! Defines the command-line arguments and subcommands for the paramsuite CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ColorMode;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "paramsuite",
    version,
    about = "Runs data-driven test suites, one child per parameter set."
)]
pub struct ParamsuiteArgs {
    /// YAML runner configuration (empty_parameters, color, log_filter).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overrides the configured colour mode.
    #[arg(long, global = true, value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered suites.
    List,
    /// Print the pre-run description tree of each matching suite.
    Plan {
        /// Regular expression matched against suite names.
        pattern: Option<String>,
    },
    /// Run every matching suite and report the results.
    Run {
        /// Regular expression matched against suite names.
        pattern: Option<String>,
    },
}
