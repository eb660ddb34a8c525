//! Conversion table between [`PropertyValue`]s and typed fields.

use std::collections::BTreeMap;

use crate::value::PropertyValue;
use crate::{ConfigError, ConfigResult};

/// Build a typed field value from a property value.
pub trait FromProperty: Sized {
    /// Name of the target type used in conversion errors.
    const EXPECTED: &'static str;

    /// Convert `value`, naming `property` in any error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Conversion`] when `value` has the wrong shape
    /// or does not parse.
    fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self>;
}

/// Render a typed field value as a property value.
pub trait IntoProperty {
    /// Borrowing conversion into a [`PropertyValue`].
    fn to_property(&self) -> PropertyValue;
}

fn scalar<'a, T: FromProperty>(property: &str, value: &'a PropertyValue) -> ConfigResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ConfigError::conversion(property, T::EXPECTED, value))
}

impl FromProperty for String {
    const EXPECTED: &'static str = "string";

    fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self> {
        match value {
            PropertyValue::Null => Ok(Self::new()),
            _ => scalar::<Self>(property, value).map(str::to_owned),
        }
    }
}

impl IntoProperty for String {
    fn to_property(&self) -> PropertyValue {
        PropertyValue::scalar(self.as_str())
    }
}

impl FromProperty for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self> {
        let text = scalar::<Self>(property, value)?;
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(ConfigError::conversion(property, Self::EXPECTED, value)),
        }
    }
}

impl IntoProperty for bool {
    fn to_property(&self) -> PropertyValue {
        PropertyValue::scalar(self.to_string())
    }
}

macro_rules! integer_property {
    ($($ty:ty),*) => {$(
        impl FromProperty for $ty {
            const EXPECTED: &'static str = stringify!($ty);

            fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self> {
                scalar::<Self>(property, value)?
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::conversion(property, Self::EXPECTED, value))
            }
        }

        impl IntoProperty for $ty {
            fn to_property(&self) -> PropertyValue {
                PropertyValue::scalar(self.to_string())
            }
        }
    )*};
}

integer_property!(i64, u32);

impl<T: FromProperty> FromProperty for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self> {
        match value {
            PropertyValue::Null => Ok(None),
            PropertyValue::Scalar(text) if text.trim().is_empty() => Ok(None),
            _ => T::from_property(property, value).map(Some),
        }
    }
}

impl<T: IntoProperty> IntoProperty for Option<T> {
    fn to_property(&self) -> PropertyValue {
        self.as_ref()
            .map_or(PropertyValue::Null, IntoProperty::to_property)
    }
}

/// Lists accept a sequence of scalars or a comma-separated scalar.
impl FromProperty for Vec<String> {
    const EXPECTED: &'static str = "list of strings";

    fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self> {
        match value {
            PropertyValue::Null => Ok(Self::new()),
            PropertyValue::Scalar(text) => Ok(text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect()),
            PropertyValue::Sequence(items) => items
                .iter()
                .map(|item| scalar::<Self>(property, item).map(str::to_owned))
                .collect(),
            PropertyValue::Mapping(_) | PropertyValue::Pair(..) => {
                Err(ConfigError::conversion(property, Self::EXPECTED, value))
            }
        }
    }
}

impl IntoProperty for Vec<String> {
    fn to_property(&self) -> PropertyValue {
        PropertyValue::scalars(self.iter().map(String::as_str))
    }
}

impl FromProperty for BTreeMap<String, String> {
    const EXPECTED: &'static str = "table of strings";

    fn from_property(property: &str, value: &PropertyValue) -> ConfigResult<Self> {
        match value {
            PropertyValue::Null => Ok(Self::new()),
            PropertyValue::Mapping(map) => map
                .iter()
                .map(|(key, item)| {
                    scalar::<Self>(property, item).map(|text| (key.clone(), text.to_owned()))
                })
                .collect(),
            PropertyValue::Scalar(_) | PropertyValue::Sequence(_) | PropertyValue::Pair(..) => {
                Err(ConfigError::conversion(property, Self::EXPECTED, value))
            }
        }
    }
}

impl IntoProperty for BTreeMap<String, String> {
    fn to_property(&self) -> PropertyValue {
        PropertyValue::Mapping(
            self.iter()
                .map(|(key, item)| (key.clone(), PropertyValue::scalar(item.as_str())))
                .collect(),
        )
    }
}

/// Implement the conversion pair for a closed enum through its `FromStr` and
/// `Display` impls.
macro_rules! keyword_property {
    ($ty:ty, $expected:literal) => {
        impl $crate::target::FromProperty for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_property(
                property: &str,
                value: &$crate::value::PropertyValue,
            ) -> $crate::ConfigResult<Self> {
                value
                    .as_str()
                    .and_then(|text| text.trim().parse().ok())
                    .ok_or_else(|| $crate::ConfigError::conversion(property, Self::EXPECTED, value))
            }
        }

        impl $crate::target::IntoProperty for $ty {
            fn to_property(&self) -> $crate::value::PropertyValue {
                $crate::value::PropertyValue::scalar(self.to_string())
            }
        }
    };
}

pub(crate) use keyword_property;
