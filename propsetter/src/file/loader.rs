//! Loading of TOML documents together with their `extends` ancestors.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use camino::Utf8PathBuf;
use figment::Figment;
use figment::providers::{Format, Toml};
use serde::de::DeserializeOwned;

use super::helpers::read_optional;
use super::path::{canonicalise, normalise_cycle_key, resolve_base_path};
use crate::{ConfigError, ConfigResult, ConfigResultExt};

/// Documents from an inheritance chain, ordered ancestor-first.
///
/// The first entry is the root ancestor; the last is the file that was
/// requested.
#[derive(Debug)]
pub(crate) struct LayerChain<T> {
    /// Parsed documents with their canonical source paths.
    pub(crate) layers: Vec<(T, Utf8PathBuf)>,
}

/// Load the TOML document at `path` and every document it `extends`.
///
/// Each file is extracted into `T` on its own, so callers decide how layers
/// combine. The `extends` key is read before extraction; `T` may ignore it.
///
/// # Errors
///
/// Returns [`ConfigError::File`] when a file is missing or unreadable,
/// [`ConfigError::Gathering`] when a document does not match `T`, and
/// [`ConfigError::CyclicExtends`] when the chain loops.
pub(crate) fn load_toml_chain<T: DeserializeOwned>(path: &Path) -> ConfigResult<LayerChain<T>> {
    if !path.is_file() {
        return Err(ConfigError::file_problem(
            ErrorKind::NotFound,
            path,
            "definition file does not exist",
        ));
    }
    let mut visited = HashSet::new();
    let mut stack = Vec::new();
    with_cycle_detection(path, &mut visited, &mut stack, load_chain_for_file)
}

fn with_cycle_detection<T, F>(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    stack: &mut Vec<PathBuf>,
    operation: F,
) -> ConfigResult<T>
where
    F: FnOnce(&Path, &mut HashSet<PathBuf>, &mut Vec<PathBuf>) -> ConfigResult<T>,
{
    let canonical = canonicalise(path)?;
    let normalised = normalise_cycle_key(&canonical);
    if !visited.insert(normalised.clone()) {
        let mut cycle: Vec<String> = stack.iter().map(|p| p.display().to_string()).collect();
        cycle.push(canonical.display().to_string());
        return Err(Arc::new(ConfigError::CyclicExtends {
            cycle: cycle.join(" -> "),
        }));
    }
    stack.push(canonical.clone());
    let result = operation(&canonical, visited, stack);
    visited.remove(&normalised);
    stack.pop();
    result
}

fn load_chain_for_file<T: DeserializeOwned>(
    canonical: &Path,
    visited: &mut HashSet<PathBuf>,
    stack: &mut Vec<PathBuf>,
) -> ConfigResult<LayerChain<T>> {
    let utf8_path = Utf8PathBuf::from_path_buf(canonical.to_path_buf())
        .map_err(|p| {
            ConfigError::file_problem(ErrorKind::InvalidInput, &p, "definition paths must be valid UTF-8")
        })?;
    let text = read_optional(&utf8_path)?
        .ok_or_else(|| {
            ConfigError::file_problem(
                ErrorKind::NotFound,
                canonical,
                "definition file disappeared while loading",
            )
        })?;
    let figment = Figment::from(Toml::string(&text));
    let value: T = figment.extract().into_config()?;

    let mut chain = match get_extends(&figment, canonical)? {
        Some(base) => {
            let base_canonical = resolve_base_path(canonical, &base)?;
            if !base_canonical.is_file() {
                return Err(ConfigError::file_problem(
                    ErrorKind::InvalidInput,
                    &base_canonical,
                    "extended path is not a regular file",
                ));
            }
            with_cycle_detection(&base_canonical, visited, stack, load_chain_for_file)?
        }
        None => LayerChain { layers: Vec::new() },
    };
    chain.layers.push((value, utf8_path));
    Ok(chain)
}

/// Validate and extract the `extends` value from `figment`.
///
/// Returns `Ok(None)` if the key is absent. Empty strings and non-strings are
/// rejected.
fn get_extends(figment: &Figment, current_path: &Path) -> ConfigResult<Option<PathBuf>> {
    match figment.find_value("extends") {
        Ok(val) => {
            let base = val.as_str().ok_or_else(|| {
                ConfigError::file_problem(
                    ErrorKind::InvalidData,
                    current_path,
                    "'extends' key must be a string",
                )
            })?;
            if base.trim().is_empty() {
                return Err(ConfigError::file_problem(
                    ErrorKind::InvalidData,
                    current_path,
                    "'extends' key must be a non-empty string",
                ));
            }
            Ok(Some(PathBuf::from(base)))
        }
        Err(e) if e.missing() => Ok(None),
        Err(e) => Err(ConfigError::file(current_path, e)),
    }
}
