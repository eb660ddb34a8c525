//! Trait-based conversions between external error types and `ConfigError`.

use figment::Error as FigmentError;

use super::ConfigError;

impl From<FigmentError> for ConfigError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}

impl From<quick_xml::DeError> for ConfigError {
    fn from(e: quick_xml::DeError) -> Self {
        Self::Parse {
            document: String::from("XML configuration document"),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse {
            document: String::from("JSON document"),
            message: format!("{e} at line {}, column {}", e.line(), e.column()),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse {
            document: String::from("TOML document"),
            message: e.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Definition {
            message: e.to_string(),
        }
    }
}
