//! Typed property access on design objects.
//!
//! [`PropertyTarget`] is the seam setters use to read and write named
//! properties. Design-object structs derive it with
//! `#[derive(PropertyTarget)]`, which generates a `match` over the struct's
//! fields and routes every value through [`FromProperty`] / [`IntoProperty`].

mod convert;

pub use convert::{FromProperty, IntoProperty};
pub(crate) use convert::keyword_property;
pub use propsetter_macros::PropertyTarget;

use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult};

/// Named property access on an in-memory object.
pub trait PropertyTarget {
    /// Name used in diagnostics for this kind of target.
    fn target_name(&self) -> &'static str;

    /// Every property name the target accepts, in declaration order.
    fn property_names(&self) -> &'static [&'static str];

    /// Read the current value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProperty`] when the target has no such
    /// property.
    fn get_property(&self, name: &str) -> ConfigResult<PropertyValue>;

    /// Convert `value` and store it under `name`.
    ///
    /// Returns `true` when the stored value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProperty`] for unknown names and
    /// [`ConfigError::Conversion`] when `value` does not fit the field type.
    fn set_property(&mut self, name: &str, value: &PropertyValue) -> ConfigResult<bool>;

    /// Reset `name` to its default value.
    ///
    /// Returns `true` when the stored value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProperty`] for unknown names.
    fn clear_property(&mut self, name: &str) -> ConfigResult<bool>;

    /// Returns `true` when `name` is one of [`Self::property_names`].
    fn has_property(&self, name: &str) -> bool {
        self.property_names().contains(&name)
    }
}

/// Untyped target for handlers that do not configure a design object.
///
/// Any property name is accepted and values are stored as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyBag {
    values: PropertyMap,
}

impl PropertyBag {
    /// Values stored so far.
    #[must_use]
    pub const fn values(&self) -> &PropertyMap {
        &self.values
    }

    /// Consume the bag, returning its values.
    #[must_use]
    pub fn into_values(self) -> PropertyMap {
        self.values
    }
}

impl PropertyTarget for PropertyBag {
    fn target_name(&self) -> &'static str {
        "global properties"
    }

    fn property_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn has_property(&self, _name: &str) -> bool {
        true
    }

    fn get_property(&self, name: &str) -> ConfigResult<PropertyValue> {
        Ok(self.values.get(name).cloned().unwrap_or_default())
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> ConfigResult<bool> {
        if self.values.get(name) == Some(value) {
            return Ok(false);
        }
        self.values.insert(name.to_owned(), value.clone());
        Ok(true)
    }

    fn clear_property(&mut self, name: &str) -> ConfigResult<bool> {
        Ok(self.values.remove(name).is_some())
    }
}

/// Fail with [`ConfigError::UnknownProperty`] for `name` on `target`.
///
/// # Errors
///
/// Always returns an error; generated accessors call it for unmatched names.
#[doc(hidden)]
pub fn unknown<T>(target: &'static str, name: &str) -> ConfigResult<T> {
    Err(ConfigError::unknown_property(target, name))
}

/// Store `next` in `slot`, returning whether the value changed.
#[doc(hidden)]
pub fn replace<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}

#[cfg(test)]
mod tests;
