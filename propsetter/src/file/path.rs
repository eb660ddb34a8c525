//! Filesystem path helpers used while resolving `extends` relationships.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{ConfigError, ConfigResult};

/// Canonicalise `p` using platform-specific rules.
///
/// On Windows the [`dunce`](https://docs.rs/dunce/latest/dunce/) crate is used
/// to avoid introducing UNC prefixes in diagnostic messages.
///
/// # Errors
///
/// Returns a [`ConfigError::File`] if canonicalisation fails.
pub(super) fn canonicalise(p: &Path) -> ConfigResult<PathBuf> {
    #[cfg(windows)]
    {
        dunce::canonicalize(p).map_err(|e| ConfigError::file(p, e))
    }
    #[cfg(not(windows))]
    {
        std::fs::canonicalize(p).map_err(|e| ConfigError::file(p, e))
    }
}

/// Normalise a canonical path for case-insensitive cycle detection.
///
/// Windows and macOS keys are lower-cased; elsewhere the path is returned
/// unchanged.
pub(super) fn normalise_cycle_key(path: &Path) -> PathBuf {
    #[cfg(any(windows, target_os = "macos"))]
    {
        match path.to_str() {
            Some(text) => PathBuf::from(text.to_lowercase()),
            None => path.to_path_buf(),
        }
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    {
        path.to_path_buf()
    }
}

/// Resolve an `extends` path relative to the file that declares it.
///
/// The target must already exist; a missing file yields a not-found error
/// naming both paths.
pub(super) fn resolve_base_path(current_path: &Path, base: &Path) -> ConfigResult<PathBuf> {
    let parent = current_path.parent().ok_or_else(|| {
        ConfigError::file_problem(
            ErrorKind::InvalidInput,
            current_path,
            "cannot determine parent directory when resolving 'extends'",
        )
    })?;
    let resolved_base = if base.is_absolute() {
        base.to_path_buf()
    } else {
        canonicalise(parent)?.join(base)
    };
    canonicalise(&resolved_base).map_err(|err| {
        let ConfigError::File { source, .. } = err.as_ref() else {
            return err;
        };
        match source.downcast_ref::<std::io::Error>() {
            Some(io_err) if io_err.kind() == ErrorKind::NotFound => ConfigError::file_problem(
                ErrorKind::NotFound,
                &resolved_base,
                format!(
                    "extended definition '{}' does not exist (referenced from '{}')",
                    resolved_base.display(),
                    current_path.display()
                ),
            ),
            _ => err,
        }
    })
}
