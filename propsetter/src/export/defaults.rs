//! Default configuration documents generated from a definition.

use tracing::warn;

use crate::ConfigResult;
use crate::definition::Definition;
use crate::normalize::denormalize;
use crate::value::{PropertyMap, PropertyValue, get_path};

/// Value written for placeholders nobody supplied.
pub const FIXME: &str = "FIXME";

/// Render a default configuration document with one entry per placeholder
/// `definition` references.
///
/// Entries take their value from `known` (looked up by dotted path) or the
/// [`FIXME`] sentinel. Keys below `prefix.solution.name` become nested
/// property sets. Keys without a `prefix.solution.` part cannot be placed in
/// a document and are skipped with a warning.
///
/// # Errors
///
/// Propagates rendering failures from [`denormalize`].
pub fn default_config_shell(definition: &Definition, known: &PropertyMap) -> ConfigResult<String> {
    let mut map = PropertyMap::new();
    for key in definition.placeholder_keys() {
        let segments: Vec<&str> = key.split('.').collect();
        let [prefix, solution, name, nested @ ..] = segments.as_slice() else {
            warn!(key = %key, "placeholder lacks a publisherPrefix.solutionName prefix");
            continue;
        };
        let value = get_path(known, &key)
            .cloned()
            .unwrap_or_else(|| PropertyValue::scalar(FIXME));
        let top = format!("{prefix}.{solution}.{name}");
        if !insert_nested(&mut map, &top, nested, value) {
            warn!(key = %key, "placeholder conflicts with a scalar entry; skipped");
        }
    }
    denormalize(&map)
}

/// Insert `value` at `top` followed by the `nested` path, creating mappings
/// on the way. Returns `false` when a non-mapping value is in the way.
fn insert_nested(map: &mut PropertyMap, top: &str, nested: &[&str], value: PropertyValue) -> bool {
    let Some((last, parents)) = nested.split_last() else {
        map.entry(top.to_owned()).or_insert(value);
        return true;
    };
    let mut slot = map
        .entry(top.to_owned())
        .or_insert_with(|| PropertyValue::Mapping(PropertyMap::new()));
    for segment in parents {
        let PropertyValue::Mapping(children) = slot else {
            return false;
        };
        slot = children
            .entry((*segment).to_owned())
            .or_insert_with(|| PropertyValue::Mapping(PropertyMap::new()));
    }
    let PropertyValue::Mapping(children) = slot else {
        return false;
    };
    children.entry((*last).to_owned()).or_insert(value);
    true
}
