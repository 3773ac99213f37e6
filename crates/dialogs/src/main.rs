//! Entry point for the `dialogs` binary.

mod cli;
mod error;
mod load;

use std::{path::Path, process};

use clap::Parser;
use dialog_config::ValidationReport;
use dialog_engine::{DialogEngine, EngineSettings};
use ron::ser::{PrettyConfig, to_string_pretty};
use tracing::error;

use crate::{
    cli::{Cli, Commands},
    error::{Error, Result},
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli {
        log,
        settings,
        command,
    } = Cli::parse();
    logging::init(&log.spec());
    let settings = load::load_settings(settings.as_deref())?;

    match command {
        Commands::List(args) => list(&engine(settings, &args.dir)?),
        Commands::Validate(args) => {
            let report = engine(settings, &args.dir.dir)?.validate();
            print_report(&report);
            if args.strict && report.has_errors() {
                return Err(Error::Invalid(report.summary()));
            }
            Ok(())
        }
        Commands::Show(args) => {
            let dialog = engine(settings, &args.dir.dir)?.open(&args.id)?;
            let text = to_string_pretty(&dialog, PrettyConfig::default())?;
            println!("{text}");
            Ok(())
        }
    }
}

/// Build an engine over the dialogs under `dir`.
fn engine(settings: EngineSettings, dir: &Path) -> Result<DialogEngine> {
    let catalog = load::load_dir(dir)?;
    Ok(DialogEngine::builder(settings).catalog(catalog).build())
}

/// Print ids with their enabled state.
fn list(engine: &DialogEngine) -> Result<()> {
    let catalog = engine.catalog();
    for id in catalog.ids() {
        let state = if catalog.is_enabled(id) { "" } else { " (disabled)" };
        println!("{id}{state}");
    }
    Ok(())
}

/// Print every issue, its suggestion and the summary.
fn print_report(report: &ValidationReport) {
    for issue in &report.issues {
        println!("{issue}");
        if let Some(s) = &issue.suggestion {
            println!("  suggestion: {s}");
        }
    }
    println!("{}", report.summary());
}
