//! Named configuration runs: apply, re-apply and de-apply.
//!
//! [`ConfigService`] ties the pipeline together. It normalises the default
//! and local documents, compares them with the last successful run, resolves
//! the definition's handlers, validates them against every other applied
//! configuration and merges them into the store. Each run is recorded in a
//! [`RunHistory`] so the next run can compute a delta.

mod history;
mod listener;

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{error, info, warn};

pub use history::{JsonFileHistory, MemoryHistory, RunHistory, RunRecord, RunStatus};
pub use listener::ConfigListener;

use crate::definition::Definition;
use crate::delta::find_delta;
use crate::handler::Handler;
use crate::mapper::{MapInput, map_handlers};
use crate::merger::{MergeMode, merge};
use crate::model::ObjectId;
use crate::normalize::normalize;
use crate::setter::SetterRegistry;
use crate::store::DesignObjectStore;
use crate::validate::{validate_collisions, validate_handlers};
use crate::value::{PropertyMap, expand_paths, overlay};
use crate::{ConfigError, ConfigResult, ParseContextExt};

/// Documents making up one named configuration.
#[derive(Clone, Debug)]
pub struct ConfigDocuments {
    /// Configuration name, the key of its run history.
    pub name: String,
    /// Handler definition.
    pub definition: Definition,
    /// Default configuration document.
    pub default_xml: String,
    /// Local overrides of the defaults.
    pub local_xml: Option<String>,
}

/// How much of a configuration an apply runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApplyMode {
    /// Resolve and run every handler.
    #[default]
    Full,
    /// Run only handlers reached by properties changed since the last
    /// successful run; skip entirely when nothing changed.
    DeltaOnly,
}

/// Summary of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyReport {
    /// Configuration name.
    pub name: String,
    /// Recorded outcome.
    pub status: RunStatus,
    /// Objects saved or deleted.
    pub touched: Vec<ObjectId>,
    /// Values written by global handlers.
    pub globals: PropertyMap,
    /// `true` when a delta-only apply found nothing to do.
    pub skipped: bool,
}

/// Effective property layers of one pair of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyLayers {
    /// Defaults overlaid with local overrides, with dotted paths expanded.
    pub combined: PropertyMap,
    /// Defaults alone, with dotted paths expanded.
    pub defaults: PropertyMap,
}

impl PropertyLayers {
    /// Normalise `default_xml` and overlay `local_xml` on it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when either document is malformed.
    pub fn from_documents(default_xml: &str, local_xml: Option<&str>) -> ConfigResult<Self> {
        let defaults = normalize(default_xml).for_document("default configuration")?;
        let mut combined = defaults.clone();
        if let Some(local) = local_xml {
            overlay(
                &mut combined,
                &normalize(local).for_document("local configuration")?,
            );
        }
        Ok(Self {
            combined: expand_paths(&combined),
            defaults: expand_paths(&defaults),
        })
    }

    fn of_run(run: &RunRecord) -> ConfigResult<Self> {
        Self::from_documents(&run.default_doc, run.local_doc.as_deref())
    }
}

/// Handlers ready to merge.
struct Prepared {
    handlers: Vec<Handler>,
    has_prev: bool,
}

/// Applies and de-applies named configurations against a store.
pub struct ConfigService<S, H> {
    store: S,
    history: H,
    registry: SetterRegistry,
    listeners: Vec<Box<dyn ConfigListener>>,
}

impl<S: DesignObjectStore, H: RunHistory> ConfigService<S, H> {
    /// Service using the built-in setters.
    #[must_use]
    pub fn new(store: S, history: H) -> Self {
        Self {
            store,
            history,
            registry: SetterRegistry::default(),
            listeners: Vec::new(),
        }
    }

    /// Replace the setter registry.
    #[must_use]
    pub fn with_registry(mut self, registry: SetterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a listener notified around every run.
    pub fn add_listener(&mut self, listener: Box<dyn ConfigListener>) {
        self.listeners.push(listener);
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run history.
    #[must_use]
    pub const fn history(&self) -> &H {
        &self.history
    }

    /// Release the store and history.
    #[must_use]
    pub fn into_parts(self) -> (S, H) {
        (self.store, self.history)
    }

    /// Apply `docs`, re-applying over the last successful run if there is
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Apply`] wrapping the cause when the run fails;
    /// the failure is recorded first and listeners see whatever was touched.
    /// History access failures are returned unwrapped.
    pub fn apply(&mut self, docs: &ConfigDocuments, mode: ApplyMode) -> ConfigResult<ApplyReport> {
        let name = docs.name.as_str();
        info!(config = %name, mode = ?mode, "applying configuration");
        let definition_doc = docs.definition.to_toml_string()?;
        let previous = self.history.last_success(name)?;

        let (touched, globals, error) = match self.prepare(docs, previous.as_ref(), mode) {
            Ok(None) => {
                info!(config = %name, "no property changed since the last run; skipping");
                return Ok(ApplyReport {
                    name: name.to_owned(),
                    status: RunStatus::Success,
                    touched: Vec::new(),
                    globals: PropertyMap::new(),
                    skipped: true,
                });
            }
            Ok(Some(prepared)) => {
                let outcome = merge(
                    &mut self.store,
                    &prepared.handlers,
                    prepared.has_prev,
                    MergeMode::Apply,
                );
                (outcome.touched, outcome.globals, outcome.error)
            }
            Err(err) => (BTreeSet::new(), PropertyMap::new(), Some(err)),
        };

        let record = RunRecord {
            name: name.to_owned(),
            status: RunStatus::Success,
            default_doc: docs.default_xml.clone(),
            local_doc: docs.local_xml.clone(),
            definition_doc,
            touched: touched.into_iter().collect(),
            sequence: 0,
        };
        self.finish(record, globals, error)
    }

    /// Undo the last successful run of `name` and forget its history.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotApplied`] when `name` has no successful
    /// run, and [`ConfigError::Apply`] when undoing fails; a failed de-apply
    /// keeps the history so it can be retried.
    pub fn deapply(&mut self, name: &str) -> ConfigResult<ApplyReport> {
        let Some(run) = self.history.last_success(name)? else {
            return Err(Arc::new(ConfigError::NotApplied {
                name: name.to_owned(),
            }));
        };
        info!(config = %name, "de-applying configuration");
        self.notify_pre(name);

        let (touched, globals, error) = match self.prepare_deapply(&run) {
            Ok(handlers) => {
                let outcome = merge(&mut self.store, &handlers, false, MergeMode::Unapply);
                (outcome.touched, outcome.globals, outcome.error)
            }
            Err(err) => (BTreeSet::new(), PropertyMap::new(), Some(err)),
        };
        let succeeded = error.is_none();
        let record = RunRecord {
            touched: touched.into_iter().collect(),
            sequence: 0,
            ..run
        };
        let report = self.finish(record, globals, error)?;
        if succeeded {
            self.history.forget(name)?;
        }
        Ok(report)
    }

    fn prepare(
        &self,
        docs: &ConfigDocuments,
        previous_run: Option<&RunRecord>,
        mode: ApplyMode,
    ) -> ConfigResult<Option<Prepared>> {
        let current = PropertyLayers::from_documents(&docs.default_xml, docs.local_xml.as_deref())?;
        let previous = previous_run
            .map(PropertyLayers::of_run)
            .transpose()?
            .map(|layers| layers.combined)
            .unwrap_or_default();

        let delta = match mode {
            ApplyMode::DeltaOnly if !previous.is_empty() => {
                let delta = find_delta(&current.combined, &previous);
                if delta.is_empty() {
                    return Ok(None);
                }
                Some(delta)
            }
            ApplyMode::DeltaOnly | ApplyMode::Full => None,
        };

        self.notify_pre(&docs.name);
        let input = MapInput {
            current: &current.combined,
            current_defaults: &current.defaults,
            previous: &previous,
            delta: delta.as_ref(),
            report_misses: true,
        };
        let handlers = map_handlers(&docs.definition, &self.registry, &input)?;

        let mut report = validate_handlers(&handlers);
        let others = self.other_configurations(&docs.name)?;
        validate_collisions(
            &handlers,
            others.iter().map(|(n, h)| (n.as_str(), h.as_slice())),
            &mut report,
        );
        report.into_result(&docs.name)?;

        Ok(Some(Prepared {
            handlers,
            has_prev: input.has_prev(),
        }))
    }

    fn prepare_deapply(&self, run: &RunRecord) -> ConfigResult<Vec<Handler>> {
        let definition = Definition::from_toml_str(&run.definition_doc)?;
        let layers = PropertyLayers::of_run(run)?;
        let empty = PropertyMap::new();
        map_handlers(
            &definition,
            &self.registry,
            &MapInput {
                current: &layers.combined,
                current_defaults: &layers.defaults,
                previous: &empty,
                delta: None,
                report_misses: true,
            },
        )
    }

    /// Handlers of every other successfully applied configuration, resolved
    /// as they were last applied.
    fn other_configurations(&self, name: &str) -> ConfigResult<Vec<(String, Vec<Handler>)>> {
        let mut out = Vec::new();
        for run in self.history.successful_runs()? {
            if run.name == name {
                continue;
            }
            let resolved = Definition::from_toml_str(&run.definition_doc).and_then(|definition| {
                let layers = PropertyLayers::of_run(&run)?;
                let empty = PropertyMap::new();
                map_handlers(
                    &definition,
                    &self.registry,
                    &MapInput {
                        current: &layers.combined,
                        current_defaults: &layers.defaults,
                        previous: &empty,
                        delta: None,
                        report_misses: false,
                    },
                )
            });
            match resolved {
                Ok(handlers) => out.push((run.name, handlers)),
                Err(err) => {
                    warn!(config = %run.name, error = %err, "skipping collision check");
                }
            }
        }
        Ok(out)
    }

    /// Notify listeners, record the run and turn a failure into
    /// [`ConfigError::Apply`].
    fn finish(
        &mut self,
        mut record: RunRecord,
        globals: PropertyMap,
        error: Option<Arc<ConfigError>>,
    ) -> ConfigResult<ApplyReport> {
        if error.is_some() {
            record.status = RunStatus::Failure;
        }
        for listener in &self.listeners {
            listener.config_changed(&record.name, &record.touched, record.status);
        }
        let report = ApplyReport {
            name: record.name.clone(),
            status: record.status,
            touched: record.touched.clone(),
            globals,
            skipped: false,
        };
        let touched = record.touched.clone();
        self.history.record(record)?;

        match error {
            None => {
                info!(config = %report.name, touched = report.touched.len(), "configuration run succeeded");
                Ok(report)
            }
            Some(source) => {
                error!(config = %report.name, error = %source, "configuration run failed");
                Err(Arc::new(ConfigError::Apply {
                    name: report.name,
                    touched,
                    source,
                }))
            }
        }
    }

    fn notify_pre(&self, name: &str) {
        for listener in &self.listeners {
            listener.pre_configuration(name);
        }
    }
}
