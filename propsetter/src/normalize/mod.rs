//! Normalisation of solution configuration documents into property maps.
//!
//! A document holds `SolutionConfig` sections; each contributes the prefix
//! `publisherPrefix.solutionName` to the keys of its top-level properties and
//! property sets. Nested sets become [`PropertyValue::Mapping`]s, or lists of
//! anonymous mappings when a container repeats unnamed groups.
//!
//! # Examples
//!
//! ```rust
//! use propsetter::normalize::normalize;
//! use propsetter::value::PropertyValue;
//!
//! let xml = r#"<SolutionConfigurations>
//!   <SolutionConfig publisherPrefix="com" solutionName="Blog">
//!     <property name="label" value="Blog post"/>
//!   </SolutionConfig>
//! </SolutionConfigurations>"#;
//! let map = normalize(xml)?;
//! assert_eq!(map.get("com.Blog.label"), Some(&PropertyValue::scalar("Blog post")));
//! # Ok::<_, std::sync::Arc<propsetter::ConfigError>>(())
//! ```
//!
//! [`PropertyValue::Mapping`]: crate::value::PropertyValue::Mapping

mod build;
pub(crate) mod schema;
mod writer;
pub(crate) mod xml_writer;

use crate::value::{PropertyMap, expand_paths};
use crate::{ConfigError, ConfigResult, ConfigResultExt};

use schema::SolutionConfigurations;

/// Parse `xml` and build the nested property map.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the document is malformed or a
/// `SolutionConfig` lacks its prefix attributes. Badly named property sets
/// are skipped with a warning.
pub fn normalize(xml: &str) -> ConfigResult<PropertyMap> {
    let doc: SolutionConfigurations = quick_xml::de::from_str(xml).into_config()?;
    let mut out = PropertyMap::new();
    for config in &doc.configs {
        let prefix = config.publisher_prefix.trim();
        let solution = config.solution_name.trim();
        if prefix.is_empty() || solution.is_empty() {
            return Err(ConfigError::parse(
                "XML configuration document",
                "SolutionConfig requires non-blank publisherPrefix and solutionName",
            ));
        }
        let path = format!("{prefix}.{solution}");
        for (name, value) in build::container(&config.properties, &config.property_sets, 1, &path)
        {
            out.insert(format!("{path}.{name}"), value);
        }
    }
    Ok(out)
}

/// Like [`normalize`], additionally exposing every nested entry under its
/// dotted path.
///
/// # Errors
///
/// See [`normalize`].
pub fn normalize_resolved(xml: &str) -> ConfigResult<PropertyMap> {
    normalize(xml).map(|map| expand_paths(&map))
}

/// Render `map` (as produced by [`normalize`]) back into a document.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when a key lacks the
/// `publisherPrefix.solutionName.` prefix.
pub fn denormalize(map: &PropertyMap) -> ConfigResult<String> {
    writer::write_document(map)
}
