//! Typed design-object families.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{GeneratorKind, Visibility};
use crate::target::PropertyTarget;

/// Per-field override declared on a content type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOverride {
    /// Field the override applies to.
    pub field: String,
    /// Replacement label.
    pub label: String,
    /// Whether authors must supply the field.
    pub required: bool,
}

/// Content type definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, PropertyTarget)]
pub struct ContentType {
    /// Object name.
    #[property(skip)]
    pub name: String,
    /// Display label.
    pub label: String,
    /// Free-form description.
    pub description: String,
    /// Who may see items of this type.
    pub visibility: Visibility,
    /// Icon shown in authoring tools.
    pub icon_path: Option<String>,
    /// Workflow new items enter.
    pub default_workflow: Option<String>,
    /// Field used as the item title.
    pub title_field: Option<String>,
    /// Managed by the `field-overrides` setter.
    #[property(skip)]
    pub field_overrides: Vec<FieldOverride>,
}

/// Presentation template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, PropertyTarget)]
pub struct Template {
    /// Object name.
    #[property(skip)]
    pub name: String,
    /// Display label.
    pub label: String,
    /// Free-form description.
    pub description: String,
    /// Whether the template may be used on any site.
    pub global: bool,
    /// MIME type of rendered output.
    pub mime_type: String,
    /// Assembler plugin that renders the template.
    pub assembler: String,
    /// Slots the template exposes.
    pub slots: Vec<String>,
}

/// Publishing site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, PropertyTarget)]
pub struct Site {
    /// Object name.
    #[property(skip)]
    pub name: String,
    /// Display label.
    pub label: String,
    /// Public base URL.
    #[property(rename = "url")]
    pub base_url: String,
    /// Filesystem root the site publishes to.
    pub publish_path: String,
    /// Root folder of the site's content tree.
    pub folder_root: String,
    /// Namespaces allowed in site-relative links.
    pub allowed_namespaces: Vec<String>,
    /// Site variables available to templates.
    pub variables: BTreeMap<String, String>,
}

/// Workflow definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, PropertyTarget)]
pub struct Workflow {
    /// Object name.
    #[property(skip)]
    pub name: String,
    /// Display label.
    pub label: String,
    /// Free-form description.
    pub description: String,
    /// Role that administers the workflow.
    pub admin_role: String,
    /// State new items start in.
    pub initial_state: String,
    /// Ordered state names.
    pub states: Vec<String>,
}

/// Location scheme used to generate publishing locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, PropertyTarget)]
pub struct LocationScheme {
    /// Object name.
    #[property(skip)]
    pub name: String,
    /// Publishing context the scheme belongs to.
    pub context: String,
    /// Content type the scheme applies to.
    pub content_type: String,
    /// Template the scheme applies to.
    pub template: String,
    /// How paths are generated.
    pub generator: GeneratorKind,
    /// Generator parameters.
    pub parameters: BTreeMap<String, String>,
    /// Evaluation order among schemes of the same context.
    pub sort_rank: u32,
}

/// Template slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, PropertyTarget)]
pub struct Slot {
    /// Object name.
    #[property(skip)]
    pub name: String,
    /// Display label.
    pub label: String,
    /// Free-form description.
    pub description: String,
    /// Whether the slot is managed by the system.
    pub system: bool,
    /// Maximum number of items, unbounded when absent.
    pub max_items: Option<u32>,
    /// Relative ordering weight.
    pub weight: i64,
}

macro_rules! named {
    ($($ty:ty),*) => {$(
        impl $ty {
            pub(super) fn named(name: String) -> Self {
                Self {
                    name,
                    ..Self::default()
                }
            }
        }
    )*};
}

named!(ContentType, Template, Site, Workflow, LocationScheme, Slot);
