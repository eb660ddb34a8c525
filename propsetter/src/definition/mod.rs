//! Configuration definition documents.
//!
//! A definition lists handler records, each naming an object family, its
//! target object name(s), optional extra properties and an ordered list of
//! setters with literal or `${placeholder}` property values:
//!
//! ```toml
//! extends = "base.toml"
//!
//! [[handler]]
//! type = "content-type"
//! name = "${com.Blog.articleType}"
//!
//! [[handler.setter]]
//! kind = "property"
//! properties = { label = "${com.Blog.articleLabel}" }
//! ```
//!
//! `extends` documents are loaded first and their handlers come first.

mod schema;

use std::collections::BTreeSet;
use std::path::Path;

use figment::Figment;
use figment::providers::{Format, Toml};
use serde::Deserialize;

pub use schema::{Definition, HandlerDef, SetterDef};

use crate::file::load_toml_chain;
use crate::{ConfigResult, ConfigResultExt};

#[derive(Deserialize)]
struct DefinitionLayer {
    #[serde(default, rename = "extends")]
    _extends: Option<String>,
    #[serde(flatten)]
    definition: Definition,
}

impl Definition {
    /// Load the definition at `path`, following `extends`.
    ///
    /// # Errors
    ///
    /// Returns file, gathering or cycle errors from the loader and
    /// [`crate::ConfigError::Definition`] when a handler is malformed.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let chain = load_toml_chain::<DefinitionLayer>(path)?;
        let handlers = chain
            .layers
            .into_iter()
            .flat_map(|(layer, _)| layer.definition.handlers)
            .collect();
        let definition = Self { handlers };
        definition.check_shape()?;
        Ok(definition)
    }

    /// Parse a definition held in memory. `extends` is not followed.
    ///
    /// # Errors
    ///
    /// See [`Definition::load`].
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let layer: DefinitionLayer = Figment::from(Toml::string(text)).extract().into_config()?;
        layer.definition.check_shape()?;
        Ok(layer.definition)
    }

    /// Render the definition as TOML, as stored in run history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Definition`] when a value cannot be
    /// expressed in TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).into_config()
    }

    /// Every placeholder key referenced anywhere in the definition.
    #[must_use]
    pub fn placeholder_keys(&self) -> BTreeSet<String> {
        self.handlers
            .iter()
            .flat_map(HandlerDef::raw_values)
            .flat_map(crate::placeholder::placeholder_keys)
            .collect()
    }
}
