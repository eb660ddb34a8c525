//! Capability-scoped reads and writes of whole files.

use std::io::{ErrorKind, Write as _};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::{ConfigError, ConfigResult};

/// Return the parent directory of `path`, falling back to `"."` when the path
/// has no parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Open the parent directory of `path` via `cap-std` and extract the file name.
fn open_parent_dir_and_name(path: &Utf8Path) -> ConfigResult<(Dir, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            ConfigError::file_problem(ErrorKind::InvalidInput, path, "cannot determine file name")
        })?;
    let dir = Dir::open_ambient_dir(parent_or_dot(path), ambient_authority())
        .map_err(|err| ConfigError::file(path, err))?;
    Ok((dir, file_name.to_owned()))
}

/// Read `path` as UTF-8, returning `None` when it does not exist.
pub(crate) fn read_optional(path: &Utf8Path) -> ConfigResult<Option<String>> {
    let (dir, name) = open_parent_dir_and_name(path)?;
    match dir.read_to_string(&name) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ConfigError::file(path, err)),
    }
}

/// Replace the contents of `path` with `text`.
pub(crate) fn write_file(path: &Utf8Path, text: &str) -> ConfigResult<()> {
    let (dir, name) = open_parent_dir_and_name(path)?;
    let mut file = dir.create(&name).map_err(|err| ConfigError::file(path, err))?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|err| ConfigError::file(path, err))
}
