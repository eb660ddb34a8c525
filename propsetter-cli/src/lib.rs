//! Library interface of the `propsetter` command-line tool.
//!
//! The binary parses arguments with [`cli::Cli`], layers [`settings::Settings`]
//! and dispatches to [`commands`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod settings;

use std::io::Write;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::settings::{Settings, SettingsOverrides};

/// Settings overrides carried by the parsed command line.
#[must_use]
pub fn overrides_from(cli: &Cli) -> SettingsOverrides {
    let delta_only = match &cli.command {
        Command::Apply(args) if args.delta_only => Some(true),
        _ => None,
    };
    SettingsOverrides {
        store: cli.store.clone(),
        history: cli.history.clone(),
        delta_only,
        log_filter: cli.log_filter.clone(),
    }
}

/// Run the parsed command with `settings`, writing results to `out`.
///
/// # Errors
///
/// Returns whatever the selected command fails with.
pub fn run(cli: &Cli, settings: &Settings, out: &mut dyn Write) -> Result<(), CliError> {
    match &cli.command {
        Command::Apply(args) => commands::apply(settings, args, out),
        Command::Deapply(args) => commands::deapply(settings, args, out),
        Command::Normalise(args) => commands::normalise(args, out),
        Command::ExportDefaults(args) => commands::export_defaults(args, out),
        Command::ExportDefinition(args) => commands::export_definition(args, out),
    }
}
