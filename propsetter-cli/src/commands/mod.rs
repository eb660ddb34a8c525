//! Implementations of the `propsetter` subcommands.
//!
//! Every command writes its result to the supplied writer so the binary can
//! hand over stdout and tests can capture the output.

use std::io::Write;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use propsetter::definition::Definition;
use propsetter::export::{ExportDescriptor, default_config_shell, definition_shell};
use propsetter::model::ObjectId;
use propsetter::normalize::normalize;
use propsetter::service::{
    ApplyMode, ApplyReport, ConfigDocuments, ConfigListener, ConfigService, JsonFileHistory,
    PropertyLayers, RunStatus,
};
use propsetter::store::MemoryStore;
use propsetter::value::PropertyMap;
use tracing::info;

use crate::cli::{ApplyArgs, DeapplyArgs, ExportDefaultsArgs, ExportDefinitionArgs, NormaliseArgs};
use crate::error::CliError;
use crate::settings::Settings;

/// Logs configuration lifecycle events.
struct LogListener;

impl ConfigListener for LogListener {
    fn pre_configuration(&self, name: &str) {
        info!(config = %name, "configuration starting");
    }

    fn config_changed(&self, name: &str, touched: &[ObjectId], status: RunStatus) {
        info!(config = %name, touched = touched.len(), status = %status, "configuration finished");
    }
}

type Service = ConfigService<MemoryStore, JsonFileHistory>;

fn open_service(settings: &Settings) -> Result<Service, CliError> {
    let store = MemoryStore::load_snapshot(&settings.store)?;
    let history = JsonFileHistory::open(&settings.history)?;
    let mut service = ConfigService::new(store, history);
    service.add_listener(Box::new(LogListener));
    Ok(service)
}

/// Persist the store, then surface the run's result.
fn finish(
    service: Service,
    settings: &Settings,
    outcome: propsetter::ConfigResult<ApplyReport>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let (store, _history) = service.into_parts();
    store.save_snapshot(&settings.store)?;
    let report = outcome?;
    let status = if report.skipped {
        "SKIPPED".to_owned()
    } else {
        report.status.to_string()
    };
    writeln!(
        out,
        "{} {status} ({} object(s) touched)",
        report.name,
        report.touched.len()
    )
    .map_err(CliError::Output)
}

/// `propsetter apply`
///
/// The store snapshot is written even when the run fails, so objects touched
/// before the failure stay in line with the recorded history.
///
/// # Errors
///
/// Returns file, parse and apply errors.
pub fn apply(settings: &Settings, args: &ApplyArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let docs = ConfigDocuments {
        name: args.name.clone(),
        definition: Definition::load(args.definition.as_std_path())?,
        default_xml: read_text(&args.default_doc)?,
        local_xml: args.local_doc.as_deref().map(read_text).transpose()?,
    };
    let mode = if args.delta_only || settings.delta_only {
        ApplyMode::DeltaOnly
    } else {
        ApplyMode::Full
    };
    let mut service = open_service(settings)?;
    let outcome = service.apply(&docs, mode);
    finish(service, settings, outcome, out)
}

/// `propsetter deapply`
///
/// # Errors
///
/// Returns file errors and the de-apply failure, including
/// [`propsetter::ConfigError::NotApplied`].
pub fn deapply(
    settings: &Settings,
    args: &DeapplyArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut service = open_service(settings)?;
    let outcome = service.deapply(&args.name);
    finish(service, settings, outcome, out)
}

/// `propsetter normalise`
///
/// # Errors
///
/// Returns file and parse errors.
pub fn normalise(args: &NormaliseArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let map = normalize(&read_text(&args.document)?)?;
    let json = serde_json::to_string_pretty(&map)?;
    writeln!(out, "{json}").map_err(CliError::Output)
}

/// `propsetter export-defaults`
///
/// # Errors
///
/// Returns file, parse and definition errors.
pub fn export_defaults(args: &ExportDefaultsArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let definition = Definition::load(args.definition.as_std_path())?;
    let known = match &args.default_doc {
        Some(path) => PropertyLayers::from_documents(&read_text(path)?, None)?.combined,
        None => PropertyMap::new(),
    };
    let xml = default_config_shell(&definition, &known)?;
    out.write_all(xml.as_bytes()).map_err(CliError::Output)
}

/// `propsetter export-definition`
///
/// # Errors
///
/// Returns file, parse and definition errors.
pub fn export_definition(args: &ExportDefinitionArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let descriptor = ExportDescriptor::from_toml_str(&read_text(&args.descriptor)?)?;
    let toml = definition_shell(&descriptor)?.to_toml_string()?;
    out.write_all(toml.as_bytes()).map_err(CliError::Output)
}

fn read_text(path: &Utf8Path) -> Result<String, CliError> {
    let io_error = |source: std::io::Error| CliError::Io {
        path: path.to_owned(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no file name",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    dir.read_to_string(name).map_err(io_error)
}

#[cfg(test)]
mod tests;
