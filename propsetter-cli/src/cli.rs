//! Command-line interface definitions for `propsetter`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(name = "propsetter")]
#[command(about = "Apply layered property documents to design objects")]
#[command(version)]
pub struct Cli {
    /// Settings file; defaults to `propsetter.toml` in the working directory.
    #[arg(long, value_name = "path", global = true)]
    pub settings: Option<Utf8PathBuf>,
    /// Object store snapshot.
    #[arg(long, value_name = "path", global = true)]
    pub store: Option<Utf8PathBuf>,
    /// Run history file.
    #[arg(long, value_name = "path", global = true)]
    pub history: Option<Utf8PathBuf>,
    /// Tracing filter directive, for example `propsetter=debug`.
    #[arg(long, value_name = "filter", global = true)]
    pub log_filter: Option<String>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply a named configuration.
    Apply(ApplyArgs),
    /// Undo the last successful run of a named configuration.
    Deapply(DeapplyArgs),
    /// Print the normalised property map of a configuration document as JSON.
    #[command(alias = "normalize")]
    Normalise(NormaliseArgs),
    /// Print a default configuration document covering a definition's
    /// placeholders.
    ExportDefaults(ExportDefaultsArgs),
    /// Print a definition that exposes the listed objects' properties.
    ExportDefinition(ExportDefinitionArgs),
}

/// Arguments of `propsetter apply`.
#[derive(Debug, ClapArgs)]
pub struct ApplyArgs {
    /// Configuration name.
    #[arg(long)]
    pub name: String,
    /// Definition document (TOML).
    #[arg(long, value_name = "path")]
    pub definition: Utf8PathBuf,
    /// Default configuration document (XML).
    #[arg(long = "default", value_name = "path")]
    pub default_doc: Utf8PathBuf,
    /// Local configuration document (XML) overriding the defaults.
    #[arg(long = "local", value_name = "path")]
    pub local_doc: Option<Utf8PathBuf>,
    /// Only run handlers affected by properties changed since the last
    /// successful run.
    #[arg(long)]
    pub delta_only: bool,
}

/// Arguments of `propsetter deapply`.
#[derive(Debug, ClapArgs)]
pub struct DeapplyArgs {
    /// Configuration name.
    #[arg(long)]
    pub name: String,
}

/// Arguments of `propsetter normalise`.
#[derive(Debug, ClapArgs)]
pub struct NormaliseArgs {
    /// Configuration document (XML).
    #[arg(value_name = "xml")]
    pub document: Utf8PathBuf,
}

/// Arguments of `propsetter export-defaults`.
#[derive(Debug, ClapArgs)]
pub struct ExportDefaultsArgs {
    /// Definition document (TOML).
    #[arg(long, value_name = "path")]
    pub definition: Utf8PathBuf,
    /// Existing default configuration whose values are carried over.
    #[arg(long = "default", value_name = "path")]
    pub default_doc: Option<Utf8PathBuf>,
}

/// Arguments of `propsetter export-definition`.
#[derive(Debug, ClapArgs)]
pub struct ExportDefinitionArgs {
    /// Export descriptor (TOML).
    #[arg(value_name = "descriptor")]
    pub descriptor: Utf8PathBuf,
}
