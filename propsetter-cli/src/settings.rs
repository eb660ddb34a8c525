//! Layered settings of the `propsetter` binary.
//!
//! Built-in defaults are overridden by the settings file, then by
//! `PROPSETTER_*` environment variables and finally by command-line flags.
//! `PROPSETTER_LOG` is accepted as a shorthand for `PROPSETTER_LOG_FILTER`.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Settings file read from the working directory when `--settings` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "propsetter.toml";

const ENV_PREFIX: &str = "PROPSETTER_";

/// Effective settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// JSON snapshot of the object store.
    pub store: Utf8PathBuf,
    /// JSON run history.
    pub history: Utf8PathBuf,
    /// Apply only handlers affected by changed properties.
    pub delta_only: bool,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: Utf8PathBuf::from("propsetter-store.json"),
            history: Utf8PathBuf::from("propsetter-history.json"),
            delta_only: false,
            log_filter: "info".to_owned(),
        }
    }
}

/// Values given on the command line. Absent values leave lower layers intact.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SettingsOverrides {
    /// See [`Settings::store`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<Utf8PathBuf>,
    /// See [`Settings::history`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Utf8PathBuf>,
    /// See [`Settings::delta_only`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_only: Option<bool>,
    /// See [`Settings::log_filter`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Settings {
    /// Merge every settings layer.
    ///
    /// An explicit `settings_file` must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingSettings`] for a missing explicit file and
    /// [`CliError::Settings`] when a layer holds invalid values.
    pub fn load(
        settings_file: Option<&Utf8Path>,
        overrides: &SettingsOverrides,
    ) -> Result<Self, CliError> {
        let file = match settings_file {
            Some(path) if !path.exists() => return Err(CliError::MissingSettings(path.to_owned())),
            Some(path) => path,
            None => Utf8Path::new(DEFAULT_SETTINGS_FILE),
        };
        let env = Env::prefixed(ENV_PREFIX).map(|key| {
            if key.as_str().eq_ignore_ascii_case("log") {
                "log_filter".into()
            } else {
                key.into()
            }
        });
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file.as_std_path()))
            .merge(env)
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(CliError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serial_test::serial;
    use test_helpers::figment::{jail_error, with_jail};

    #[rstest]
    #[serial]
    fn defaults_apply_without_any_layer() -> Result<()> {
        let settings = with_jail(|_| {
            Settings::load(None, &SettingsOverrides::default()).map_err(jail_error)
        })?;
        ensure!(settings == Settings::default(), "{settings:?}");
        Ok(())
    }

    #[rstest]
    #[serial]
    fn layers_override_in_order() -> Result<()> {
        let settings = with_jail(|jail| {
            jail.create_file(
                DEFAULT_SETTINGS_FILE,
                "store = \"file-store.json\"\nhistory = \"file-history.json\"\n",
            )?;
            jail.set_env("PROPSETTER_HISTORY", "env-history.json");
            jail.set_env("PROPSETTER_DELTA_ONLY", "true");
            let overrides = SettingsOverrides {
                store: Some(Utf8PathBuf::from("cli-store.json")),
                ..SettingsOverrides::default()
            };
            Settings::load(None, &overrides).map_err(jail_error)
        })?;
        ensure!(settings.store.as_str() == "cli-store.json", "{settings:?}");
        ensure!(settings.history.as_str() == "env-history.json", "{settings:?}");
        ensure!(settings.delta_only, "{settings:?}");
        Ok(())
    }

    #[rstest]
    #[serial]
    fn log_shorthand_sets_the_filter() -> Result<()> {
        let settings = with_jail(|jail| {
            jail.set_env("PROPSETTER_LOG", "propsetter=debug");
            Settings::load(None, &SettingsOverrides::default()).map_err(jail_error)
        })?;
        ensure!(settings.log_filter == "propsetter=debug", "{settings:?}");
        Ok(())
    }

    #[rstest]
    #[serial]
    fn explicit_settings_file_must_exist() -> Result<()> {
        let missing = with_jail(|_| {
            Ok(Settings::load(
                Some(Utf8Path::new("elsewhere.toml")),
                &SettingsOverrides::default(),
            ))
        })?;
        ensure!(
            matches!(missing, Err(CliError::MissingSettings(_))),
            "{missing:?}"
        );
        Ok(())
    }

    #[rstest]
    #[serial]
    fn invalid_values_are_reported() -> Result<()> {
        let result = with_jail(|jail| {
            jail.set_env("PROPSETTER_DELTA_ONLY", "sometimes");
            Ok(Settings::load(None, &SettingsOverrides::default()))
        })?;
        ensure!(matches!(result, Err(CliError::Settings(_))), "{result:?}");
        Ok(())
    }
}
