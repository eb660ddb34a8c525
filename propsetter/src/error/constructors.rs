//! Constructors for `ConfigError`.

use std::error::Error;
use std::io;
use std::path::Path;
use std::sync::Arc;

use super::{ConfigError, ErrorList};

impl ConfigError {
    /// Combine `errors` into one, or `None` when there are none.
    ///
    /// A lone uniquely owned error is returned as is; anything else becomes
    /// [`Self::Aggregate`].
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(ErrorList::from(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(ErrorList::from(arcs)))
        })
    }

    /// Construct a business-rule violation wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use propsetter::ConfigError;
    /// let e = ConfigError::business(format!("duplicate scheme name '{}'", "home"));
    /// assert_eq!(e.to_string(), "duplicate scheme name 'home'");
    /// ```
    #[must_use]
    pub fn business(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Business {
            message: message.into(),
        })
    }

    /// Construct a parse failure for `document`.
    #[must_use]
    pub fn parse(document: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Parse {
            document: document.into(),
            message: message.into(),
        })
    }

    /// Construct a definition error.
    #[must_use]
    pub fn definition(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Definition {
            message: message.into(),
        })
    }

    /// Construct a store failure for `object`.
    #[must_use]
    pub fn store(object: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Store {
            object: object.into(),
            message: message.into(),
        })
    }

    /// Construct an unknown-property error for `object_type`.
    #[must_use]
    pub fn unknown_property(object_type: impl Into<String>, property: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::UnknownProperty {
            object_type: object_type.into(),
            property: property.into(),
        })
    }

    /// Construct a conversion failure for `property`.
    ///
    /// # Examples
    ///
    /// ```
    /// use propsetter::ConfigError;
    /// use propsetter::value::PropertyValue;
    ///
    /// let e = ConfigError::conversion("maxItems", "u32", &PropertyValue::scalar("many"));
    /// assert_eq!(
    ///     e.to_string(),
    ///     "cannot convert value 'many' of property 'maxItems' to u32"
    /// );
    /// ```
    #[must_use]
    pub fn conversion(
        property: impl Into<String>,
        expected: &'static str,
        value: &crate::value::PropertyValue,
    ) -> Arc<Self> {
        Arc::new(Self::Conversion {
            property: property.into(),
            expected,
            value: value.to_string(),
        })
    }

    /// Construct a file failure for `path` caused by `source`.
    #[must_use]
    pub fn file(
        path: impl AsRef<Path>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a file failure for `path` described by `message`.
    #[must_use]
    pub fn file_problem(
        kind: io::ErrorKind,
        path: impl AsRef<Path>,
        message: impl Into<String>,
    ) -> Arc<Self> {
        Self::file(path, io::Error::new(kind, message.into()))
    }
}
