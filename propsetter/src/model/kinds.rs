//! Closed keyword enums stored on design objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::target::keyword_property;

/// Who may see objects of a content type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,
    /// Visible to the owning solution only.
    Private,
    /// Hidden from authoring tools.
    Hidden,
}

/// Strategy a location scheme uses to produce paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// Path built from an expression.
    #[default]
    Expression,
    /// Path built from the content item's folder.
    Folder,
    /// Path supplied by an external extension.
    Extension,
}

macro_rules! keyword_enum {
    ($ty:ident { $($variant:ident => $text:literal),* $(,)? }) => {
        impl $ty {
            /// Keyword used in configuration values.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)*
                    other => Err(format!("unknown {} '{other}'", stringify!($ty))),
                }
            }
        }
    };
}

keyword_enum!(Visibility {
    Public => "public",
    Private => "private",
    Hidden => "hidden",
});

keyword_enum!(GeneratorKind {
    Expression => "expression",
    Folder => "folder",
    Extension => "extension",
});

keyword_property!(Visibility, "visibility (public, private, hidden)");
keyword_property!(GeneratorKind, "generator (expression, folder, extension)");
