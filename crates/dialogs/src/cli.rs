//! Command-line interface definitions for dialogs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `dialogs` binary.
#[derive(Parser, Debug)]
#[command(
    name = "dialogs",
    about = "Inspect, validate and compile dialog configuration",
    version
)]
pub struct Cli {
    /// Logging controls.
    #[command(flatten)]
    pub log: LogArgs,

    /// Engine settings file in RON syntax.
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Which command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List dialog ids found under a directory.
    List(DirArgs),
    /// Validate every dialog under a directory.
    Validate(ValidateArgs),
    /// Compile one dialog and print it as RON.
    Show(ShowArgs),
}

/// Arguments naming a dialog directory.
#[derive(Args, Debug, Clone)]
pub struct DirArgs {
    /// Root directory holding `*.ron` and `*.json` dialog files.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Dialog directory.
    #[command(flatten)]
    pub dir: DirArgs,

    /// Exit with an error when any validation error is found.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Dialog directory.
    #[command(flatten)]
    pub dir: DirArgs,

    /// Dialog id, e.g. `templates/confirmation`.
    #[arg(value_name = "ID")]
    pub id: String,
}
