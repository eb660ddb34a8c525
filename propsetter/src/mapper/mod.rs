//! Resolution of definition records into handlers for one cycle.
//!
//! Each handler record is resolved twice. The previous pass runs against the
//! current defaults overlaid with the previous run's properties, silently,
//! so setters can undo what they set before. The current pass runs against
//! the current properties and reports misses. In delta mode a first pass
//! against the delta decides which handlers and setters are touched at all;
//! untouched handlers are dropped and untouched setters become no-ops.

use tracing::debug;

use crate::definition::{Definition, HandlerDef};
use crate::handler::{Handler, HandlerTarget, RemovalPolicy};
use crate::placeholder::{ResolveMode, is_unresolved, resolve, resolve_map};
use crate::setter::{Setter, SetterRegistry};
use crate::value::{PropertyMap, PropertyValue, overlay};
use crate::{ConfigError, ConfigResult};

/// Property layers a cycle resolves against.
#[derive(Clone, Copy, Debug)]
pub struct MapInput<'a> {
    /// Current defaults overlaid with local overrides.
    pub current: &'a PropertyMap,
    /// Current defaults alone.
    pub current_defaults: &'a PropertyMap,
    /// Combined properties of the last successful run; empty when none.
    pub previous: &'a PropertyMap,
    /// Changed-or-added properties, present only in delta mode.
    pub delta: Option<&'a PropertyMap>,
    /// Log unresolved placeholders of the current pass.
    pub report_misses: bool,
}

impl MapInput<'_> {
    /// Returns `true` when a previous run exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        !self.previous.is_empty()
    }
}

/// Resolve every handler record of `definition`.
///
/// Without previous properties the delta is ignored and every handler is
/// resolved in full.
///
/// # Errors
///
/// Returns [`ConfigError::Definition`] for unknown setter kinds and for
/// target names that do not resolve to names.
pub fn map_handlers(
    definition: &Definition,
    registry: &SetterRegistry,
    input: &MapInput<'_>,
) -> ConfigResult<Vec<Handler>> {
    let delta = input.delta.filter(|_| input.has_prev());
    let prev_source = input.has_prev().then(|| {
        let mut source = input.current_defaults.clone();
        overlay(&mut source, input.previous);
        source
    });

    let sources = Sources {
        current: input.current,
        current_mode: if input.report_misses {
            ResolveMode::Full
        } else {
            ResolveMode::Delta
        },
        previous: prev_source.as_ref(),
    };

    let mut handlers = Vec::with_capacity(definition.handlers.len());
    for (index, def) in definition.handlers.iter().enumerate() {
        let touched = match delta {
            Some(changed) => Touched::against(def, changed),
            None => Touched::all(def),
        };
        if !touched.any() {
            debug!(handler = %def.label(index), "handler untouched by delta");
            continue;
        }
        handlers.push(map_handler(def, index, registry, &sources, &touched)?);
    }
    Ok(handlers)
}

/// Which parts of a handler record the delta reaches.
struct Touched {
    target: bool,
    setters: Vec<bool>,
}

impl Touched {
    fn all(def: &HandlerDef) -> Self {
        Self {
            target: true,
            setters: vec![true; def.setters.len()],
        }
    }

    fn against(def: &HandlerDef, delta: &PropertyMap) -> Self {
        let replaced = |value: &PropertyValue| resolve(value, delta, ResolveMode::Delta).replaced;
        let target = def.name.iter().chain(&def.names).any(replaced)
            || def.extra.values().any(replaced);
        let setters = def
            .setters
            .iter()
            .map(|s| resolve_map(&s.properties, delta, ResolveMode::Delta).1)
            .collect();
        Self { target, setters }
    }

    fn any(&self) -> bool {
        self.target || self.setters.iter().any(|t| *t)
    }

    fn setter(&self, index: usize) -> bool {
        self.target || self.setters.get(index).copied().unwrap_or(false)
    }
}

/// Maps one handler record resolves against.
struct Sources<'a> {
    current: &'a PropertyMap,
    current_mode: ResolveMode,
    previous: Option<&'a PropertyMap>,
}

impl Sources<'_> {
    fn current(&self, map: &PropertyMap) -> PropertyMap {
        resolve_map(map, self.current, self.current_mode).0
    }

    fn previous(&self, map: &PropertyMap) -> PropertyMap {
        self.previous
            .map(|prev| resolve_map(map, prev, ResolveMode::Delta).0)
            .unwrap_or_default()
    }
}

fn map_handler(
    def: &HandlerDef,
    index: usize,
    registry: &SetterRegistry,
    sources: &Sources<'_>,
    touched: &Touched,
) -> ConfigResult<Handler> {
    let label = def.label(index);
    let target = resolve_target(def, &label, sources)?;

    let mut setters = Vec::with_capacity(def.setters.len());
    for (i, setter_def) in def.setters.iter().enumerate() {
        let strategy = registry.get(&setter_def.kind)?;
        let mut setter = Setter::new(
            strategy,
            sources.current(&setter_def.properties),
            sources.previous(&setter_def.properties),
        );
        if !touched.setter(i) {
            setter.clear();
        }
        setters.push(setter);
    }

    Ok(Handler {
        object_type: def.object_type,
        target,
        removal: def.removal.unwrap_or_else(|| {
            def.object_type
                .map_or(RemovalPolicy::Undo, RemovalPolicy::for_type)
        }),
        extra: sources.current(&def.extra),
        prev_extra: sources.previous(&def.extra),
        setters,
    })
}

fn resolve_target(
    def: &HandlerDef,
    label: &str,
    sources: &Sources<'_>,
) -> ConfigResult<HandlerTarget> {
    if def.object_type.is_none() {
        return Ok(HandlerTarget::Unbound);
    }
    let names_in = |raw: &PropertyValue, source: &PropertyMap, mode: ResolveMode| {
        names_of(&resolve(raw, source, mode).value, label)
    };
    let current = |raw: &PropertyValue| names_in(raw, sources.current, sources.current_mode);
    let previous = |raw: &PropertyValue| -> ConfigResult<Vec<String>> {
        sources
            .previous
            .map_or_else(|| Ok(Vec::new()), |prev| names_in(raw, prev, ResolveMode::Delta))
    };

    if let Some(raw) = &def.name {
        let current_names = current(raw)?;
        let previous_names = previous(raw)?;
        if current_names.len() > 1 || previous_names.len() > 1 {
            return Err(ConfigError::definition(format!(
                "{label}: 'name' must resolve to a single name; use 'names' for lists"
            )));
        }
        return Ok(match current_names.first() {
            Some(name) if previous_names.iter().all(|prev| prev == name) => {
                HandlerTarget::Fixed(name.clone())
            }
            _ => HandlerTarget::Names {
                current: current_names,
                previous: previous_names,
            },
        });
    }
    let Some(raw) = &def.names else {
        return Ok(HandlerTarget::Names {
            current: Vec::new(),
            previous: Vec::new(),
        });
    };
    Ok(HandlerTarget::Names {
        current: current(raw)?,
        previous: previous(raw)?,
    })
}

/// Object names carried by a resolved target value. Unresolved placeholders
/// and blanks name nothing.
fn names_of(value: &PropertyValue, label: &str) -> ConfigResult<Vec<String>> {
    let scalar_names = |text: &str| -> Vec<String> {
        if is_unresolved(&PropertyValue::scalar(text)) {
            return Vec::new();
        }
        text.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    };
    match value {
        PropertyValue::Null => Ok(Vec::new()),
        PropertyValue::Scalar(text) => Ok(scalar_names(text)),
        PropertyValue::Sequence(items) => items.iter().try_fold(Vec::new(), |mut acc, item| {
            acc.extend(names_of(item, label)?);
            Ok(acc)
        }),
        PropertyValue::Mapping(_) | PropertyValue::Pair(..) => Err(ConfigError::definition(
            format!("{label}: object names must be strings, found a {}", value.kind()),
        )),
    }
}
