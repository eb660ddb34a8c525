//! Tree building from the bound document into nested property values.

use tracing::warn;

use super::schema::{PValueItem, PValues, Property, PropertySet};
use crate::value::{PropertyMap, PropertyValue};

/// Build the entries of a container holding `properties` and `sets`.
///
/// `depth` is the nesting depth of the container's children; direct children
/// of a solution section sit at depth 1.
pub(super) fn container(
    properties: &[Property],
    sets: &[PropertySet],
    depth: usize,
    path: &str,
) -> PropertyMap {
    let mut map = PropertyMap::new();
    for property in properties {
        let name = property.name.trim();
        if name.is_empty() {
            warn!(path = %path, "skipping property without a name");
            continue;
        }
        let child_path = format!("{path}.{name}");
        map.insert(name.to_owned(), property_value(property, depth + 1, &child_path));
    }
    for set in sets {
        let Some(name) = set.name() else {
            if depth == 1 {
                warn!(path = %path, "skipping unnamed propertySet at depth 1");
            } else {
                warn!(path = %path, "skipping unnamed propertySet with sibling properties");
            }
            continue;
        };
        let child_path = format!("{path}.{name}");
        map.insert(name.to_owned(), set_value(set, depth + 1, &child_path));
    }
    map
}

fn property_value(property: &Property, depth: usize, path: &str) -> PropertyValue {
    if !property.property_sets.is_empty() {
        return sets_value(&property.property_sets, depth, path);
    }
    if let Some(pvalues) = &property.pvalues {
        return list_value(pvalues);
    }
    property
        .pvalue
        .as_ref()
        .or(property.value.as_ref())
        .map_or(PropertyValue::Null, |v| PropertyValue::scalar(v.as_str()))
}

fn set_value(set: &PropertySet, depth: usize, path: &str) -> PropertyValue {
    if set.properties.is_empty() && !set.property_sets.is_empty() {
        return sets_value(&set.property_sets, depth, path);
    }
    PropertyValue::Mapping(container(&set.properties, &set.property_sets, depth, path))
}

/// Children that are all property sets: a mapping when every set is named,
/// otherwise an order-preserving list of anonymous mappings.
fn sets_value(sets: &[PropertySet], depth: usize, path: &str) -> PropertyValue {
    if sets.iter().all(|set| set.name().is_some()) {
        return PropertyValue::Mapping(container(&[], sets, depth, path));
    }
    PropertyValue::Sequence(
        sets.iter()
            .map(|set| set_value(set, depth + 1, path))
            .collect(),
    )
}

fn list_value(pvalues: &PValues) -> PropertyValue {
    PropertyValue::Sequence(
        pvalues
            .items
            .iter()
            .map(|item| match item {
                PValueItem::Value(v) => PropertyValue::scalar(v.as_str()),
                PValueItem::Pair(pair) => PropertyValue::pair(
                    PropertyValue::scalar(pair.value1.as_str()),
                    PropertyValue::scalar(pair.value2.as_str()),
                ),
            })
            .collect(),
    )
}
