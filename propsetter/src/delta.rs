//! Changed-or-added subset of a property map.
//!
//! Keys that disappeared since the previous run are never reported. Removal
//! is surfaced through object state reconciliation and the setters' previous
//! properties instead.

use crate::value::PropertyMap;

/// Entries of `new_props` that are absent from, or differ in, `old_props`.
///
/// An empty `old_props` means nothing was applied before, so `new_props` is
/// returned whole.
///
/// # Examples
///
/// ```rust
/// use propsetter::delta::find_delta;
/// use propsetter::value::{PropertyMap, PropertyValue};
///
/// let old = PropertyMap::from([
///     ("x".to_owned(), PropertyValue::scalar("1")),
///     ("gone".to_owned(), PropertyValue::scalar("2")),
/// ]);
/// let new = PropertyMap::from([
///     ("x".to_owned(), PropertyValue::scalar("1")),
///     ("y".to_owned(), PropertyValue::scalar("3")),
/// ]);
/// let delta = find_delta(&new, &old);
/// assert_eq!(delta.keys().collect::<Vec<_>>(), ["y"]);
/// ```
#[must_use]
pub fn find_delta(new_props: &PropertyMap, old_props: &PropertyMap) -> PropertyMap {
    if old_props.is_empty() {
        return new_props.clone();
    }
    new_props
        .iter()
        .filter(|(key, value)| old_props.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropertyValue;
    use rstest::rstest;

    fn map(entries: &[(&str, PropertyValue)]) -> PropertyMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[rstest]
    fn first_apply_returns_everything() {
        let new = map(&[("x", "1".into())]);
        assert_eq!(find_delta(&new, &PropertyMap::new()), new);
    }

    #[rstest]
    fn identical_maps_have_no_delta() {
        let props = map(&[("x", "1".into()), ("list", PropertyValue::scalars(["a"]))]);
        assert!(find_delta(&props, &props).is_empty());
    }

    #[rstest]
    #[case::changed(PropertyValue::scalar("2"))]
    #[case::became_null(PropertyValue::Null)]
    #[case::changed_shape(PropertyValue::scalars(["1"]))]
    fn structural_differences_are_reported(#[case] value: PropertyValue) {
        let old = map(&[("x", "1".into()), ("same", "s".into())]);
        let new = map(&[("x", value.clone()), ("same", "s".into())]);
        assert_eq!(find_delta(&new, &old), map(&[("x", value)]));
    }

    #[rstest]
    fn null_to_value_is_reported() {
        let old = map(&[("x", PropertyValue::Null)]);
        let new = map(&[("x", "1".into())]);
        assert_eq!(find_delta(&new, &old), new);
    }

    #[rstest]
    fn removed_keys_never_appear() {
        let old = map(&[("x", "1".into()), ("y", "2".into())]);
        let new = map(&[("x", "1".into())]);
        assert!(find_delta(&new, &old).is_empty());
    }
}
