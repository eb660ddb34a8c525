//! Several configuration errors reported together.

use std::fmt;
use std::sync::Arc;

use super::ConfigError;

/// Errors gathered while checking a whole document, in discovery order.
#[derive(Debug, Default)]
pub struct ErrorList(Vec<Arc<ConfigError>>);

impl ErrorList {
    /// Gathered errors.
    #[must_use]
    pub const fn errors(&self) -> &[Arc<ConfigError>] {
        self.0.as_slice()
    }

    /// Number of gathered errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was gathered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Arc<ConfigError>>> for ErrorList {
    fn from(errors: Vec<Arc<ConfigError>>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}
