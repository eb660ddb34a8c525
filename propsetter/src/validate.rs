//! Pre-merge validation findings.
//!
//! Setters validate their resolved properties, and handlers are checked
//! against those of other successfully applied configurations so one
//! object property is never owned by two packages. Any error finding aborts
//! the apply before an object is touched; warnings are only logged.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::{ConfigError, ConfigResult};
use crate::handler::Handler;
use crate::model::ObjectKey;

/// Severity of a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Aborts the apply.
    Error,
    /// Logged; the apply proceeds.
    Warning,
}

/// One validation problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFinding {
    /// How serious the problem is.
    pub severity: Severity,
    /// Object (or handler) the problem was found on.
    pub object: String,
    /// Offending property, when there is one.
    pub property: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.property {
            Some(property) => write!(f, "{level}: {}.{property}: {}", self.object, self.message),
            None => write!(f, "{level}: {}: {}", self.object, self.message),
        }
    }
}

/// Ordered collection of findings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    /// Record an error finding.
    pub fn error(&mut self, object: &str, property: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Error, object, property, message.into());
    }

    /// Record a warning finding.
    pub fn warning(&mut self, object: &str, property: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Warning, object, property, message.into());
    }

    fn push(&mut self, severity: Severity, object: &str, property: Option<&str>, message: String) {
        self.findings.push(ValidationFinding {
            severity,
            object: object.to_owned(),
            property: property.map(str::to_owned),
            message,
        });
    }

    /// Every finding in insertion order.
    #[must_use]
    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    /// Returns `true` when at least one error finding was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Error findings only.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    /// Warning findings only.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Log warnings and fail with [`ConfigError::Validation`] when any error
    /// was recorded.
    ///
    /// # Errors
    ///
    /// Returns the whole report wrapped in [`ConfigError::Validation`] when
    /// [`Self::has_errors`] is `true`.
    pub fn into_result(self, config: &str) -> ConfigResult<()> {
        for finding in self.warnings() {
            warn!(config = %config, finding = %finding, "validation warning");
        }
        if self.has_errors() {
            return Err(Arc::new(ConfigError::Validation(Box::new(self))));
        }
        Ok(())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {finding}")?;
        }
        Ok(())
    }
}

/// Run every setter's validation over resolved `handlers`.
#[must_use]
pub fn validate_handlers(handlers: &[Handler]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for handler in handlers {
        handler.validate(&mut report);
    }
    report
}

/// Report every object property configured both by `handlers` and by the
/// handlers of another configuration.
///
/// Targets are compared by the names the handlers currently resolve to;
/// wildcard patterns are compared literally.
pub fn validate_collisions<'a, I>(handlers: &[Handler], others: I, report: &mut ValidationReport)
where
    I: IntoIterator<Item = (&'a str, &'a [Handler])>,
{
    let mine = claims(handlers);
    for (other_name, other_handlers) in others {
        for (key, properties) in claims(other_handlers) {
            let Some(own) = mine.get(&key) else {
                continue;
            };
            for property in own.iter().filter(|p| properties.contains(*p)) {
                report.error(
                    &key.to_string(),
                    Some(property),
                    format!("already configured by configuration '{other_name}'"),
                );
            }
        }
    }
}

fn claims(handlers: &[Handler]) -> BTreeMap<ObjectKey, Vec<String>> {
    let mut out: BTreeMap<ObjectKey, Vec<String>> = BTreeMap::new();
    for handler in handlers {
        let Some(object_type) = handler.object_type else {
            continue;
        };
        let properties: Vec<String> = handler
            .setters
            .iter()
            .flat_map(|setter| setter.properties.keys().cloned())
            .collect();
        if properties.is_empty() {
            continue;
        }
        for name in handler.target.current_names() {
            let entry = out.entry(ObjectKey::new(object_type, name)).or_default();
            entry.extend(properties.iter().cloned());
            entry.sort();
            entry.dedup();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn errors_abort_and_warnings_do_not() {
        let mut report = ValidationReport::default();
        report.warning("content-type/Article", Some("label"), "unresolved placeholder");
        assert!(report.clone().into_result("blog").is_ok());

        report.error("content-type/Article", None, "missing template");
        assert_eq!(report.errors().count(), 1);
        let err = report.into_result("blog").expect_err("errors must abort");
        let text = err.to_string();
        assert!(text.contains("error: content-type/Article: missing template"), "{text}");
        assert!(text.contains("warning: content-type/Article.label"), "{text}");
    }
}
