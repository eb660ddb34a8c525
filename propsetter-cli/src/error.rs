//! Error types for the `propsetter` command-line tool.

use std::sync::Arc;

use camino::Utf8PathBuf;
use propsetter::ConfigError;
use thiserror::Error;

/// Errors surfaced by the `propsetter` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] Arc<ConfigError>),

    #[error("invalid settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    #[error("settings file {0} does not exist")]
    MissingSettings(Utf8PathBuf),

    #[error("failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("invalid log filter '{filter}': {message}")]
    LogFilter { filter: String, message: String },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Settings(Box::new(err))
    }
}
