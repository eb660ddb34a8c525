//! CLI entrypoint for `propsetter`.

use std::io;

use clap::Parser;
use propsetter_cli::cli::Cli;
use propsetter_cli::error::CliError;
use propsetter_cli::settings::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.settings.as_deref(), &propsetter_cli::overrides_from(&cli))?;
    init_tracing(&settings.log_filter)?;
    let stdout = io::stdout();
    propsetter_cli::run(&cli, &settings, &mut stdout.lock())
}

fn init_tracing(filter: &str) -> Result<(), CliError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|err| CliError::LogFilter {
        filter: filter.to_owned(),
        message: err.to_string(),
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
    Ok(())
}
