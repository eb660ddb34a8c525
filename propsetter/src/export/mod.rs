//! Generators for configuration shells.
//!
//! [`default_config_shell`] writes a default configuration document for a
//! definition; [`definition_shell`] writes a definition exposing every
//! property of a list of objects as a placeholder.

mod defaults;
mod definition_shell;

pub use defaults::{FIXME, default_config_shell};
pub use definition_shell::{ExportDescriptor, ExportObject, definition_shell};
