//! Unit tests for error construction and display.

use rstest::rstest;
use std::sync::Arc;

use super::ConfigError;

#[test]
fn try_aggregate_none_on_empty() {
    assert!(ConfigError::try_aggregate(Vec::<Arc<ConfigError>>::new()).is_none());
}

#[test]
fn lone_owned_error_is_returned_unwrapped() {
    let outcome = ConfigError::try_aggregate(vec![ConfigError::business("duplicate scheme")]);
    assert!(
        matches!(outcome, Some(ConfigError::Business { .. })),
        "{outcome:?}"
    );
}

#[test]
fn lone_shared_error_stays_in_a_list() {
    let shared = ConfigError::store("content-type/Article", "boom");
    match ConfigError::try_aggregate(vec![Arc::clone(&shared)]) {
        Some(ConfigError::Aggregate(list)) => assert_eq!(list.len(), 1),
        other => panic!("expected Aggregate, got {other:?}"),
    }
}

#[test]
fn several_errors_are_listed_one_per_line() {
    let errors = vec![
        ConfigError::definition("handler #1 needs 'name' or 'names'"),
        ConfigError::definition("handler #2 has a setter without 'kind'"),
    ];
    let Some(err) = ConfigError::try_aggregate(errors) else {
        panic!("two errors produced nothing");
    };
    assert_eq!(
        err.to_string(),
        "multiple configuration errors:\n  \
         - invalid configuration definition: handler #1 needs 'name' or 'names'\n  \
         - invalid configuration definition: handler #2 has a setter without 'kind'"
    );
    let ConfigError::Aggregate(list) = err else {
        panic!("expected Aggregate");
    };
    assert_eq!(list.errors().len(), 2);
    assert!(!list.is_empty());
}

#[rstest]
#[case::not_found(std::io::ErrorKind::NotFound)]
#[case::invalid_data(std::io::ErrorKind::InvalidData)]
fn file_problems_keep_their_io_kind(#[case] kind: std::io::ErrorKind) {
    let err = ConfigError::file_problem(kind, "defs/blog.toml", "cannot use this file");
    let ConfigError::File { path, source } = &*err else {
        panic!("expected File, got {err:?}");
    };
    assert_eq!(path, std::path::Path::new("defs/blog.toml"));
    let io_err = source.downcast_ref::<std::io::Error>();
    assert_eq!(io_err.map(std::io::Error::kind), Some(kind));
    assert!(err.to_string().contains("cannot use this file"));
}

#[rstest]
#[case::xml("<a><b></a>")]
#[case::truncated("<SolutionConfigurations")]
fn xml_errors_become_parse_errors(#[case] doc: &str) {
    let result: Result<crate::normalize::schema::SolutionConfigurations, quick_xml::DeError> =
        quick_xml::de::from_str(doc);
    let err = result.map_err(ConfigError::from);
    assert!(matches!(err, Err(ConfigError::Parse { .. })));
}

#[test]
fn apply_error_exposes_source() {
    let cause = ConfigError::business("missing extension 'html'");
    let err = ConfigError::Apply {
        name: String::from("pkg"),
        touched: Vec::new(),
        source: cause,
    };
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("missing extension 'html'"));
}
