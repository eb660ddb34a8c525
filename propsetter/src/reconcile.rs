//! Partition of object names into CURRENT, PREVIOUS and BOTH.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use wildmatch::WildMatch;

/// Where an object name was found across the current and previous runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectState {
    /// Only in the new configuration: create or update.
    Current,
    /// Only in the previous configuration: undo or delete.
    Previous,
    /// In both: update, removing properties that disappeared.
    Both,
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "CURRENT",
            Self::Previous => "PREVIOUS",
            Self::Both => "BOTH",
        })
    }
}

/// Returns `true` when `name` contains wildcard characters.
#[must_use]
pub fn is_pattern(name: &str) -> bool {
    name.contains(['*', '?'])
}

/// Expand `names` against `catalog`.
///
/// Plain names are kept even when the catalog does not contain them, so new
/// objects can be created. Patterns (`*`, `?`) only match existing names.
#[must_use]
pub fn expand_names(names: &[String], catalog: &[String]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if is_pattern(name) {
            let pattern = WildMatch::new(name);
            out.extend(catalog.iter().filter(|c| pattern.matches(c)).cloned());
        } else {
            out.insert(name.to_owned());
        }
    }
    out
}

/// Three-way partition of `current` and `previous`, ordered by name.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeSet;
/// use propsetter::reconcile::{partition, ObjectState};
///
/// let current = BTreeSet::from(["A".to_owned(), "B".to_owned()]);
/// let previous = BTreeSet::from(["B".to_owned(), "C".to_owned()]);
/// let states = partition(&current, &previous);
/// assert_eq!(
///     states,
///     [
///         ("A".to_owned(), ObjectState::Current),
///         ("B".to_owned(), ObjectState::Both),
///         ("C".to_owned(), ObjectState::Previous),
///     ]
/// );
/// ```
#[must_use]
pub fn partition(
    current: &BTreeSet<String>,
    previous: &BTreeSet<String>,
) -> Vec<(String, ObjectState)> {
    let mut out: Vec<(String, ObjectState)> = current
        .union(previous)
        .map(|name| {
            let state = match (current.contains(name), previous.contains(name)) {
                (true, true) => ObjectState::Both,
                (true, false) => ObjectState::Current,
                (false, _) => ObjectState::Previous,
            };
            (name.clone(), state)
        })
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[rstest]
    fn partitions_current_previous_and_both() {
        let got = partition(&set(&["A", "B"]), &set(&["B", "C"]));
        assert_eq!(
            got,
            [
                ("A".to_owned(), ObjectState::Current),
                ("B".to_owned(), ObjectState::Both),
                ("C".to_owned(), ObjectState::Previous),
            ]
        );
    }

    #[rstest]
    fn empty_inputs_contribute_nothing() {
        assert!(partition(&BTreeSet::new(), &BTreeSet::new()).is_empty());
    }

    #[rstest]
    #[case::pattern(&["Art*"], &["Article", "Artwork"])]
    #[case::single_char(&["?ews"], &["News"])]
    #[case::explicit_missing(&["Brand New"], &["Brand New"])]
    #[case::blank(&["  "], &[])]
    fn names_expand_against_the_catalog(#[case] names: &[&str], #[case] expected: &[&str]) {
        let catalog: Vec<String> = ["Article", "Artwork", "News"]
            .iter()
            .map(|n| (*n).to_owned())
            .collect();
        let names: Vec<String> = names.iter().map(|n| (*n).to_owned()).collect();
        assert_eq!(expand_names(&names, &catalog), set(expected));
    }
}
