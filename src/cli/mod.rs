//! The paramsuite command-line interface.
//!
//! The shipped binary runs the bundled demo suites. Downstream crates register their own
//! templates in a [`SuiteRegistry`] and call [`run_with`] from their `main`.

use std::cell::RefCell;
use std::process;
use std::rc::Rc;

use clap::Parser;
use miette::Diagnostic;
use regex::Regex;
use termcolor::{ColorChoice, StandardStream, WriteColor};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, ParamsuiteArgs};
use crate::cli::output::{print_names, print_plan, TextListener};
use crate::config::{ConfigError, RunnerConfig};
use crate::engine::Core;
use crate::registry::SuiteRegistry;
use crate::runner::CompositeRunner;

pub mod args;
pub mod output;

/// Environment variable holding a tracing filter; takes precedence over `log_filter`.
pub const LOG_ENV: &str = "PARAMSUITE_LOG";

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid suite pattern '{pattern}'")]
    #[diagnostic(code(paramsuite::cli::pattern))]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no suite matches '{pattern}'")]
    #[diagnostic(
        code(paramsuite::cli::no_match),
        help("run `paramsuite list` to see the registered suites")
    )]
    NoMatch { pattern: String },
}

/// The main entry point for the bundled binary.
pub fn run() {
    run_with(crate::demos::registry());
}

/// Parses the process arguments, runs the command against `registry`, and exits.
pub fn run_with(registry: SuiteRegistry) {
    let args = ParamsuiteArgs::parse();
    match execute(args, &registry) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(2);
        }
    }
}

/// Runs one command. `Ok(false)` means the command ran but tests failed.
pub fn execute(args: ParamsuiteArgs, registry: &SuiteRegistry) -> Result<bool, CliError> {
    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    if let Some(color) = args.color {
        config.color = color;
    }
    init_logging(&config);

    let choice = if config.color.use_colors() {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    match args.command {
        Command::List => {
            print_names(&mut stdout, &registry.names());
            Ok(true)
        }
        Command::Plan { pattern } => {
            let runners = select(registry, pattern.as_deref(), &config)?;
            for runner in runners.runners() {
                print_plan(&mut stdout, &runner.description(), runner.test_count());
            }
            Ok(true)
        }
        Command::Run { pattern } => {
            let runners = select(registry, pattern.as_deref(), &config)?;
            Ok(run_all(&runners, stdout))
        }
    }
}

fn select(
    registry: &SuiteRegistry,
    pattern: Option<&str>,
    config: &RunnerConfig,
) -> Result<CompositeRunner, CliError> {
    let filter = pattern
        .map(|p| {
            Regex::new(p).map_err(|source| CliError::Pattern {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()?;
    let runners: Vec<_> = registry
        .build(filter.as_ref(), config)
        .into_iter()
        .map(|(_, runner)| runner)
        .collect();
    if runners.is_empty() {
        if let Some(p) = pattern {
            return Err(CliError::NoMatch {
                pattern: p.to_string(),
            });
        }
    }
    Ok(CompositeRunner::new("paramsuite", runners))
}

fn run_all<W: WriteColor + 'static>(runner: &CompositeRunner, out: W) -> bool {
    let core = Core::new();
    core.add_listener(Rc::new(RefCell::new(TextListener::new(out))));
    let result = core.run(runner);
    tracing::info!(
        run = result.run_count(),
        failures = result.failure_count(),
        "run finished"
    );
    result.was_successful()
}

/// Installs a stderr subscriber; later calls are no-ops.
fn init_logging(config: &RunnerConfig) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
