//! Applies layered name/value property sets onto CMS design objects.
//!
//! A configuration is three documents: a TOML [`definition`] listing
//! handlers and their setters, an XML default configuration and optional XML
//! local overrides. The pipeline runs in stages:
//!
//! 1. [`normalize`] flattens the XML documents into property maps.
//! 2. [`delta`] finds what changed since the last successful run.
//! 3. [`mapper`] resolves `${placeholder}` values in every handler against
//!    the current, previous and delta properties.
//! 4. [`reconcile`] partitions target object names into CURRENT, PREVIOUS
//!    and BOTH.
//! 5. [`merger`] loads each object once, runs the setters and persists the
//!    results through a [`store::DesignObjectStore`].
//!
//! [`service::ConfigService`] drives a whole run and records its outcome.

extern crate self as propsetter;

use std::sync::Arc;

pub mod association;
pub mod definition;
pub mod delta;
mod error;
pub mod export;
mod file;
pub mod handler;
pub mod mapper;
pub mod merger;
pub mod model;
pub mod normalize;
pub mod placeholder;
pub mod reconcile;
mod result_ext;
pub mod service;
pub mod setter;
pub mod store;
pub mod target;
pub mod validate;
pub mod value;

pub use error::{ConfigError, ErrorList};
pub use result_ext::{ConfigResultExt, ParseContextExt};

/// Result alias used throughout the crate.
///
/// Errors are shared so one failure can be handed to listeners, recorded
/// and returned.
pub type ConfigResult<T> = Result<T, Arc<ConfigError>>;
