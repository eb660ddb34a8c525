//! Persisted outcomes of configuration runs.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::file::{read_optional, write_file};
use crate::model::ObjectId;
use crate::{ConfigResult, ConfigResultExt};

/// Outcome of one apply or de-apply run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    /// Every handler ran.
    Success,
    /// The run stopped on an error.
    Failure,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        })
    }
}

/// Documents and outcome of one run of a named configuration.
///
/// The literal documents are kept so the next run can compute a delta and
/// other configurations can be validated against this one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Configuration name.
    pub name: String,
    /// Run outcome.
    pub status: RunStatus,
    /// Default configuration document.
    pub default_doc: String,
    /// Local override document, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_doc: Option<String>,
    /// Definition document, rendered as TOML.
    pub definition_doc: String,
    /// Objects the run saved or deleted.
    #[serde(default)]
    pub touched: Vec<ObjectId>,
    /// Position in the history, assigned on record.
    #[serde(default)]
    pub sequence: u64,
}

/// Storage of run records.
pub trait RunHistory {
    /// Latest successful run of `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when the backend cannot be read.
    fn last_success(&self, name: &str) -> ConfigResult<Option<RunRecord>>;

    /// Store `record`, assigning its sequence number.
    ///
    /// Only the newest success and the newest failure of each name are
    /// retained.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when the backend cannot be written.
    fn record(&mut self, record: RunRecord) -> ConfigResult<()>;

    /// Latest successful run of every configuration, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when the backend cannot be read.
    fn successful_runs(&self) -> ConfigResult<Vec<RunRecord>>;

    /// Drop every record of `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when the backend cannot be written.
    fn forget(&mut self, name: &str) -> ConfigResult<()>;
}

/// History kept in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHistory {
    #[serde(default)]
    records: Vec<RunRecord>,
}

impl MemoryHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retained records in the order they were written.
    #[must_use]
    pub const fn records(&self) -> &[RunRecord] {
        self.records.as_slice()
    }

    fn latest_success(&self, name: &str) -> Option<&RunRecord> {
        self.records
            .iter()
            .rev()
            .find(|r| r.name == name && r.status == RunStatus::Success)
    }
}

impl RunHistory for MemoryHistory {
    fn last_success(&self, name: &str) -> ConfigResult<Option<RunRecord>> {
        Ok(self.latest_success(name).cloned())
    }

    fn record(&mut self, mut record: RunRecord) -> ConfigResult<()> {
        record.sequence = self
            .records
            .iter()
            .map(|r| r.sequence)
            .max()
            .map_or(1, |last| last + 1);
        self.records
            .retain(|r| r.name != record.name || r.status != record.status);
        self.records.push(record);
        Ok(())
    }

    fn successful_runs(&self) -> ConfigResult<Vec<RunRecord>> {
        let mut names: Vec<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        Ok(names
            .into_iter()
            .filter_map(|name| self.latest_success(name).cloned())
            .collect())
    }

    fn forget(&mut self, name: &str) -> ConfigResult<()> {
        self.records.retain(|r| r.name != name);
        Ok(())
    }
}

/// History persisted as a JSON file, rewritten on every change.
#[derive(Clone, Debug)]
pub struct JsonFileHistory {
    path: Utf8PathBuf,
    state: MemoryHistory,
}

impl JsonFileHistory {
    /// Open the history at `path`; a missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::File`] when the file cannot be read and
    /// [`crate::ConfigError::Parse`] when it is not a history document.
    pub fn open(location: impl AsRef<Utf8Path>) -> ConfigResult<Self> {
        let path = location.as_ref().to_owned();
        let state = match read_optional(&path)? {
            Some(text) => serde_json::from_str(&text).into_config()?,
            None => MemoryHistory::new(),
        };
        Ok(Self { path, state })
    }

    /// Location of the history file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn flush(&self) -> ConfigResult<()> {
        let text = serde_json::to_string_pretty(&self.state).into_config()?;
        write_file(&self.path, &text)
    }
}

impl RunHistory for JsonFileHistory {
    fn last_success(&self, name: &str) -> ConfigResult<Option<RunRecord>> {
        self.state.last_success(name)
    }

    fn record(&mut self, record: RunRecord) -> ConfigResult<()> {
        self.state.record(record)?;
        self.flush()
    }

    fn successful_runs(&self) -> ConfigResult<Vec<RunRecord>> {
        self.state.successful_runs()
    }

    fn forget(&mut self, name: &str) -> ConfigResult<()> {
        self.state.forget(name)?;
        self.flush()
    }
}
