//! Serde bindings for solution configuration documents.

use serde::Deserialize;

/// Document root holding one section per solution.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SolutionConfigurations {
    #[serde(rename = "SolutionConfig", default)]
    pub configs: Vec<SolutionConfig>,
}

/// Properties contributed by one `publisherPrefix.solutionName` solution.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SolutionConfig {
    #[serde(rename = "@publisherPrefix", default)]
    pub publisher_prefix: String,
    #[serde(rename = "@solutionName", default)]
    pub solution_name: String,
    #[serde(rename = "property", default)]
    pub properties: Vec<Property>,
    #[serde(rename = "propertySet", default)]
    pub property_sets: Vec<PropertySet>,
}

/// Leaf or nested named value.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Property {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@value", default)]
    pub value: Option<String>,
    #[serde(default)]
    pub pvalue: Option<String>,
    #[serde(default)]
    pub pvalues: Option<PValues>,
    #[serde(rename = "propertySet", default)]
    pub property_sets: Vec<PropertySet>,
}

/// Container of properties and further property sets.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PropertySet {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "property", default)]
    pub properties: Vec<Property>,
    #[serde(rename = "propertySet", default)]
    pub property_sets: Vec<PropertySet>,
}

impl PropertySet {
    /// Trimmed, non-blank name of the set.
    pub(crate) fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Ordered list of scalar values and pairs.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PValues {
    #[serde(rename = "$value", default)]
    pub items: Vec<PValueItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) enum PValueItem {
    #[serde(rename = "pvalue")]
    Value(String),
    #[serde(rename = "pair")]
    Pair(PairElement),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PairElement {
    #[serde(rename = "@value1", default)]
    pub value1: String,
    #[serde(rename = "@value2", default)]
    pub value2: String,
}
