//! Primary error enum for configuration application flows.

use std::sync::Arc;

use figment::Error as FigmentError;
use thiserror::Error;

use super::ErrorList;
use crate::model::ObjectId;
use crate::validate::ValidationReport;

/// Errors that can occur while normalising, resolving or applying a
/// configuration.
///
/// Every failure the pipeline reports belongs to this category; the service
/// layer wraps whatever stopped a merge in [`ConfigError::Apply`] after the
/// run has been recorded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A configuration document could not be parsed.
    #[error("failed to parse {document}: {message}")]
    Parse {
        /// Label of the offending document (path or role).
        document: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The configuration definition is structurally invalid.
    #[error("invalid configuration definition: {message}")]
    Definition {
        /// Human-readable explanation.
        message: String,
    },

    /// Error originating from a file on disk.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Cycle detected while resolving `extends`.
    #[error("cyclic extends detected: {cycle}")]
    CyclicExtends {
        /// Chain of definition files participating in the cycle.
        cycle: String,
    },

    /// Error while extracting a document through Figment.
    #[error("failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// A property value cannot be converted into the target field type.
    #[error("cannot convert value '{value}' of property '{property}' to {expected}")]
    Conversion {
        /// Property being set.
        property: String,
        /// Name of the expected target type.
        expected: &'static str,
        /// Rendering of the rejected value.
        value: String,
    },

    /// A setter addressed a property the design object does not expose.
    #[error("{object_type} has no property named '{property}'")]
    UnknownProperty {
        /// Object family that was addressed.
        object_type: String,
        /// Name of the missing property.
        property: String,
    },

    /// Validation produced at least one error finding.
    #[error("configuration validation failed:\n{0}")]
    Validation(Box<ValidationReport>),

    /// A business rule was violated while applying a configuration.
    #[error("{message}")]
    Business {
        /// Parameterised, human-readable message.
        message: String,
    },

    /// The design-object store rejected an operation.
    #[error("design object store failure for '{object}': {message}")]
    Store {
        /// Identifier of the affected object.
        object: String,
        /// Description of the failure.
        message: String,
    },

    /// Terminal failure of a named configuration run.
    #[error("failed to apply configuration '{name}': {source}")]
    Apply {
        /// Name of the configuration being applied or de-applied.
        name: String,
        /// Objects that were touched before the failure.
        touched: Vec<ObjectId>,
        /// Cause of the failure.
        #[source]
        source: Arc<ConfigError>,
    },

    /// De-apply requested for a configuration without a successful run.
    #[error("configuration '{name}' has no successful run to de-apply")]
    NotApplied {
        /// Name of the configuration.
        name: String,
    },

    /// Several errors collected during a single operation.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(Box<ErrorList>),
}
