//! Tagged property values and the flat property map.
//!
//! Every layer of the pipeline exchanges [`PropertyValue`]s: the normaliser
//! produces them from XML, the definition loader parses them from TOML, the
//! resolver substitutes them into setter properties and the setters convert
//! them into typed design-object fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// Key used to encode a [`PropertyValue::Pair`] in serialised documents.
const PAIR_KEY: &str = "pair";

/// A single configuration value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PropertyValue {
    /// Explicitly absent value.
    #[default]
    Null,
    /// Leaf string value.
    Scalar(String),
    /// Ordered list of values.
    Sequence(Vec<PropertyValue>),
    /// Named nested values.
    Mapping(BTreeMap<String, PropertyValue>),
    /// Two related values, such as a slot's content type and template.
    Pair(Box<PropertyValue>, Box<PropertyValue>),
}

/// Flat map of fully-qualified property names to values.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

impl PropertyValue {
    /// Build a scalar value.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Build a pair value.
    #[must_use]
    pub fn pair(first: Self, second: Self) -> Self {
        Self::Pair(Box::new(first), Box::new(second))
    }

    /// Build a sequence of scalars.
    #[must_use]
    pub fn scalars<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(values.into_iter().map(Self::scalar).collect())
    }

    /// Returns the string content of a scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Null | Self::Sequence(_) | Self::Mapping(_) | Self::Pair(..) => None,
        }
    }

    /// Returns `true` for [`PropertyValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Pair(..) => "pair",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Scalar(s) => f.write_str(s),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={item}")?;
                }
                f.write_str("}")
            }
            Self::Pair(first, second) => write!(f, "({first}, {second})"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::scalar(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Self>> for PropertyValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        Self::Mapping(value)
    }
}

/// Overlay `layer` onto `base`, updating `base` in place.
///
/// Nested mappings merge recursively; every other value replaces the entry in
/// `base` wholesale.
///
/// # Examples
///
/// ```rust
/// use propsetter::value::{overlay, PropertyMap, PropertyValue};
///
/// let mut base = PropertyMap::from([("a".into(), PropertyValue::scalar("1"))]);
/// let layer = PropertyMap::from([("a".into(), PropertyValue::scalar("2"))]);
/// overlay(&mut base, &layer);
/// assert_eq!(base.get("a"), Some(&PropertyValue::scalar("2")));
/// ```
pub fn overlay(base: &mut PropertyMap, layer: &PropertyMap) {
    for (key, incoming) in layer {
        match (base.get_mut(key), incoming) {
            (Some(PropertyValue::Mapping(existing)), PropertyValue::Mapping(nested)) => {
                overlay(existing, nested);
            }
            _ => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Return a copy of `map` where every nested mapping entry is also reachable
/// under its dotted fully-qualified path.
///
/// Keys already present at the top level are never overwritten.
#[must_use]
pub fn expand_paths(map: &PropertyMap) -> PropertyMap {
    let mut out = map.clone();
    for (key, value) in map {
        insert_nested(&mut out, key, value);
    }
    out
}

/// Look up `path` in `map`, descending into nested mappings when the dotted
/// path is not itself a top-level key.
///
/// The longest top-level key that prefixes `path` wins.
///
/// # Examples
///
/// ```rust
/// use propsetter::value::{get_path, PropertyMap, PropertyValue};
///
/// let site = PropertyMap::from([("title".into(), PropertyValue::scalar("Home"))]);
/// let map = PropertyMap::from([("com.Blog.site".into(), PropertyValue::Mapping(site))]);
/// assert_eq!(get_path(&map, "com.Blog.site.title"), Some(&PropertyValue::scalar("Home")));
/// assert_eq!(get_path(&map, "com.Blog.other"), None);
/// ```
#[must_use]
pub fn get_path<'a>(map: &'a PropertyMap, path: &str) -> Option<&'a PropertyValue> {
    if let Some(found) = map.get(path) {
        return Some(found);
    }
    let mut split = path.rfind('.');
    while let Some(at) = split {
        let (head, tail) = path.split_at(at);
        if let Some(PropertyValue::Mapping(children)) = map.get(head) {
            if let Some(found) = get_path(children, tail.trim_start_matches('.')) {
                return Some(found);
            }
        }
        split = head.rfind('.');
    }
    None
}

fn insert_nested(out: &mut PropertyMap, prefix: &str, value: &PropertyValue) {
    let PropertyValue::Mapping(children) = value else {
        return;
    };
    for (name, child) in children {
        let path = format!("{prefix}.{name}");
        insert_nested(out, &path, child);
        out.entry(path).or_insert_with(|| child.clone());
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, item)?;
                }
                out.end()
            }
            Self::Pair(first, second) => {
                let mut out = serializer.serialize_map(Some(1))?;
                out.serialize_entry(PAIR_KEY, &[first.as_ref(), second.as_ref()])?;
                out.end()
            }
        }
    }
}

struct PropertyValueVisitor;

impl<'de> Visitor<'de> for PropertyValueVisitor {
    type Value = PropertyValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, list, table or pair")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(PropertyValue::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Scalar(v.to_string()))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        Ok(PropertyValue::Scalar(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PropertyValue::scalar(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(PropertyValue::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        PropertyValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(PropertyValue::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = PropertyMap::new();
        while let Some((key, item)) = access.next_entry::<String, PropertyValue>()? {
            map.insert(key, item);
        }
        if map.len() == 1 {
            if let Some(PropertyValue::Sequence(items)) = map.get(PAIR_KEY) {
                if let [first, second] = items.as_slice() {
                    return Ok(PropertyValue::pair(first.clone(), second.clone()));
                }
            }
        }
        Ok(PropertyValue::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PropertyValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;

    fn mapping(entries: &[(&str, PropertyValue)]) -> PropertyValue {
        PropertyValue::Mapping(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
        )
    }

    #[rstest]
    fn overlay_merges_nested_mappings() {
        let mut base = PropertyMap::from([(
            "com.sol.site".to_owned(),
            mapping(&[("a", "1".into()), ("b", "2".into())]),
        )]);
        let layer = PropertyMap::from([(
            "com.sol.site".to_owned(),
            mapping(&[("b", "3".into())]),
        )]);
        overlay(&mut base, &layer);
        assert_eq!(
            base.get("com.sol.site"),
            Some(&mapping(&[("a", "1".into()), ("b", "3".into())]))
        );
    }

    #[rstest]
    fn overlay_replaces_sequences() {
        let mut base = PropertyMap::from([("k".to_owned(), PropertyValue::scalars(["a", "b"]))]);
        let layer = PropertyMap::from([("k".to_owned(), PropertyValue::scalars(["c"]))]);
        overlay(&mut base, &layer);
        assert_eq!(base.get("k"), Some(&PropertyValue::scalars(["c"])));
    }

    #[rstest]
    fn expand_paths_exposes_leaves_and_subtrees() {
        let inner = mapping(&[("leaf", "x".into())]);
        let map = PropertyMap::from([("p.s.group".to_owned(), mapping(&[("inner", inner.clone())]))]);
        let expanded = expand_paths(&map);
        assert_eq!(expanded.get("p.s.group.inner"), Some(&inner));
        assert_eq!(expanded.get("p.s.group.inner.leaf"), Some(&PropertyValue::scalar("x")));
        assert!(expanded.contains_key("p.s.group"));
    }

    #[rstest]
    fn display_coerces_collections() {
        let value = PropertyValue::pair("ct".into(), PropertyValue::scalars(["a", "b"]));
        assert_eq!(value.to_string(), "(ct, [a, b])");
    }

    #[rstest]
    fn json_pairs_and_nulls_round_trip() -> Result<()> {
        let value = PropertyValue::Sequence(vec![
            PropertyValue::pair("Article".into(), "Snippet".into()),
            PropertyValue::Null,
            mapping(&[("k", "v".into())]),
        ]);
        let json = serde_json::to_string(&value)?;
        ensure!(
            json == r#"[{"pair":["Article","Snippet"]},null,{"k":"v"}]"#,
            "unexpected encoding {json}"
        );
        let back: PropertyValue = serde_json::from_str(&json)?;
        ensure!(back == value, "decoded value differs: {back:?}");
        Ok(())
    }

    #[rstest]
    fn toml_numbers_and_booleans_become_scalars() -> Result<()> {
        let map: PropertyMap = toml::from_str("count = 3\nenabled = true\n")?;
        ensure!(map.get("count") == Some(&PropertyValue::scalar("3")), "count not scalar");
        ensure!(map.get("enabled") == Some(&PropertyValue::scalar("true")), "bool not scalar");
        Ok(())
    }
}
