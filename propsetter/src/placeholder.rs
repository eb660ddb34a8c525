//! `${key}` placeholder resolution.
//!
//! A scalar that is exactly one placeholder (after trimming) is replaced by
//! the raw bound value, so lists, mappings and pairs survive substitution.
//! Any other scalar has each placeholder spliced in as text. Keys missing from
//! the source map are left in place verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::value::{PropertyMap, PropertyValue};

const OPEN: &str = "${";
const CLOSE: char = '}';

/// One `${key}` occurrence; the key holds no braces.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(placeholder_pattern);

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal covered by the unit tests"
)]
fn placeholder_pattern() -> Regex {
    Regex::new(r"\$\{([^{}]*)\}").expect("placeholder pattern compiles")
}

/// How resolution misses are reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveMode {
    /// Every miss is logged as a warning.
    Full,
    /// Misses are expected and stay silent; a delta omits unrelated keys.
    Delta,
}

/// Outcome of resolving one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved value.
    pub value: PropertyValue,
    /// Whether at least one placeholder was substituted.
    pub replaced: bool,
    /// Keys that could not be found, in the order they were encountered.
    pub unresolved: Vec<String>,
}

impl Resolution {
    const fn unchanged(value: PropertyValue) -> Self {
        Self {
            value,
            replaced: false,
            unresolved: Vec::new(),
        }
    }

    fn absorb(&mut self, other: Self) -> PropertyValue {
        self.replaced |= other.replaced;
        self.unresolved.extend(other.unresolved);
        other.value
    }
}

/// Returns the key of `text` when the trimmed text is exactly one
/// placeholder.
///
/// # Examples
///
/// ```rust
/// use propsetter::placeholder::simple_placeholder;
///
/// assert_eq!(simple_placeholder(" ${a.b} "), Some("a.b"));
/// assert_eq!(simple_placeholder("x-${a.b}"), None);
/// assert_eq!(simple_placeholder("${a}${b}"), None);
/// ```
#[must_use]
pub fn simple_placeholder(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    if inner.contains(OPEN) || inner.contains(CLOSE) {
        return None;
    }
    Some(inner)
}

/// Resolve every placeholder in `value` against `props`.
///
/// # Examples
///
/// ```rust
/// use propsetter::placeholder::{resolve, ResolveMode};
/// use propsetter::value::{PropertyMap, PropertyValue};
///
/// let props = PropertyMap::from([("a.b".to_owned(), PropertyValue::scalar("X"))]);
/// let out = resolve(&"prefix-${a.b}-suffix".into(), &props, ResolveMode::Full);
/// assert_eq!(out.value, PropertyValue::scalar("prefix-X-suffix"));
/// assert!(out.replaced);
/// ```
#[must_use]
pub fn resolve(value: &PropertyValue, props: &PropertyMap, mode: ResolveMode) -> Resolution {
    match value {
        PropertyValue::Null => Resolution::unchanged(PropertyValue::Null),
        PropertyValue::Scalar(text) => resolve_text(text, props, mode),
        PropertyValue::Sequence(items) => {
            let mut out = Resolution::unchanged(PropertyValue::Null);
            let resolved = items
                .iter()
                .map(|item| out.absorb(resolve(item, props, mode)))
                .collect();
            out.value = PropertyValue::Sequence(resolved);
            out
        }
        PropertyValue::Mapping(map) => {
            let mut out = Resolution::unchanged(PropertyValue::Null);
            let resolved = map
                .iter()
                .map(|(key, item)| (key.clone(), out.absorb(resolve(item, props, mode))))
                .collect();
            out.value = PropertyValue::Mapping(resolved);
            out
        }
        PropertyValue::Pair(first, second) => {
            let mut out = Resolution::unchanged(PropertyValue::Null);
            let first = out.absorb(resolve(first, props, mode));
            let second = out.absorb(resolve(second, props, mode));
            out.value = PropertyValue::pair(first, second);
            out
        }
    }
}

/// Resolve every value of `map`, returning the resolved map and whether any
/// placeholder was substituted.
#[must_use]
pub fn resolve_map(
    map: &PropertyMap,
    props: &PropertyMap,
    mode: ResolveMode,
) -> (PropertyMap, bool) {
    let mut replaced = false;
    let resolved = map
        .iter()
        .map(|(name, value)| {
            let out = resolve(value, props, mode);
            replaced |= out.replaced;
            (name.clone(), out.value)
        })
        .collect();
    (resolved, replaced)
}

fn resolve_text(text: &str, props: &PropertyMap, mode: ResolveMode) -> Resolution {
    if text.trim().is_empty() {
        return Resolution::unchanged(PropertyValue::scalar(text));
    }
    if let Some(key) = simple_placeholder(text) {
        return match props.get(key) {
            Some(bound) => Resolution {
                value: bound.clone(),
                replaced: true,
                unresolved: Vec::new(),
            },
            None => {
                report_miss(key, mode);
                Resolution {
                    value: PropertyValue::scalar(text),
                    replaced: false,
                    unresolved: vec![key.to_owned()],
                }
            }
        };
    }

    let mut replaced = false;
    let mut unresolved = Vec::new();
    let out = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let key = caps.get(1).map_or("", |m| m.as_str());
        match props.get(key) {
            Some(PropertyValue::Scalar(bound)) => {
                replaced = true;
                bound.clone()
            }
            Some(other) => {
                replaced = true;
                other.to_string()
            }
            None => {
                report_miss(key, mode);
                unresolved.push(key.to_owned());
                caps.get(0).map_or_else(String::new, |m| m.as_str().to_owned())
            }
        }
    });
    Resolution {
        value: PropertyValue::Scalar(out.into_owned()),
        replaced,
        unresolved,
    }
}

fn report_miss(key: &str, mode: ResolveMode) {
    if mode == ResolveMode::Full {
        warn!(key = %key, "unresolved placeholder left in place");
    }
}

/// Collect every placeholder key referenced anywhere in `value`.
#[must_use]
pub fn placeholder_keys(value: &PropertyValue) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(value, &mut keys);
    keys
}

fn collect_keys(value: &PropertyValue, keys: &mut Vec<String>) {
    match value {
        PropertyValue::Null => {}
        PropertyValue::Scalar(text) => keys.extend(
            PLACEHOLDER
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|key| key.as_str().to_owned()),
        ),
        PropertyValue::Sequence(items) => items.iter().for_each(|item| collect_keys(item, keys)),
        PropertyValue::Mapping(map) => map.values().for_each(|item| collect_keys(item, keys)),
        PropertyValue::Pair(first, second) => {
            collect_keys(first, keys);
            collect_keys(second, keys);
        }
    }
}

/// Returns `true` when `value` is a whole-value placeholder that did not
/// resolve.
#[must_use]
pub fn is_unresolved(value: &PropertyValue) -> bool {
    value.as_str().and_then(simple_placeholder).is_some()
}
