//! Rendering a property map back into a solution configuration document.

use std::collections::BTreeMap;

use super::xml_writer::XmlWriter;
use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult};

type Sections<'a> = BTreeMap<(&'a str, &'a str), Vec<(&'a str, &'a PropertyValue)>>;

pub(super) fn write_document(map: &PropertyMap) -> ConfigResult<String> {
    let mut sections: Sections<'_> = BTreeMap::new();
    for (key, value) in map {
        let mut parts = key.splitn(3, '.');
        let (Some(prefix), Some(solution), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConfigError::parse(
                "property map",
                format!("key '{key}' lacks a publisherPrefix.solutionName prefix"),
            ));
        };
        sections
            .entry((prefix, solution))
            .or_default()
            .push((name, value));
    }

    let mut w = XmlWriter::new();
    w.open("SolutionConfigurations", &[], false);
    for ((prefix, solution), entries) in sections {
        w.open(
            "SolutionConfig",
            &[("publisherPrefix", prefix), ("solutionName", solution)],
            false,
        );
        for (name, value) in entries {
            write_property(&mut w, name, value);
        }
        w.close("SolutionConfig");
    }
    w.close("SolutionConfigurations");
    Ok(w.finish())
}

fn write_set(w: &mut XmlWriter, name: Option<&str>, map: &PropertyMap) {
    let attrs: Vec<(&str, &str)> = name.map(|n| ("name", n)).into_iter().collect();
    if map.is_empty() {
        w.open("propertySet", &attrs, true);
        return;
    }
    w.open("propertySet", &attrs, false);
    for (key, value) in map {
        write_property(w, key, value);
    }
    w.close("propertySet");
}

/// Writes one named entry; mappings become named property sets.
fn write_property(w: &mut XmlWriter, name: &str, value: &PropertyValue) {
    match value {
        PropertyValue::Null => w.open("property", &[("name", name)], true),
        PropertyValue::Scalar(text) => w.open("property", &[("name", name), ("value", text)], true),
        PropertyValue::Sequence(items)
            if !items.is_empty() && items.iter().all(|i| matches!(i, PropertyValue::Mapping(_))) =>
        {
            w.open("property", &[("name", name)], false);
            for item in items {
                if let PropertyValue::Mapping(map) = item {
                    write_set(w, None, map);
                }
            }
            w.close("property");
        }
        PropertyValue::Sequence(items) => {
            w.open("property", &[("name", name)], false);
            write_pvalues(w, items);
            w.close("property");
        }
        PropertyValue::Mapping(map) => write_set(w, Some(name), map),
        PropertyValue::Pair(..) => {
            w.open("property", &[("name", name)], false);
            write_pvalues(w, std::slice::from_ref(value));
            w.close("property");
        }
    }
}

fn write_pvalues(w: &mut XmlWriter, items: &[PropertyValue]) {
    if items.is_empty() {
        w.open("pvalues", &[], true);
        return;
    }
    w.open("pvalues", &[], false);
    for item in items {
        match item {
            PropertyValue::Pair(first, second) => {
                let (first, second) = (first.to_string(), second.to_string());
                w.open("pair", &[("value1", &first), ("value2", &second)], true);
            }
            PropertyValue::Scalar(text) => w.text_element("pvalue", text),
            other => w.text_element("pvalue", &other.to_string()),
        }
    }
    w.close("pvalues");
}
