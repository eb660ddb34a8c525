//! Dispatch loop applying resolved handlers to design objects.
//!
//! One [`merge`] call is one session. The session owns an identity map keyed
//! by [`ObjectKey`]: every object is loaded at most once, so later handlers
//! see the mutations of earlier ones. Objects are persisted after each
//! handler that changed them. The first failure stops the queue; the ids
//! touched before it are returned alongside the error.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::association::AssociationSets;
use crate::handler::{Handler, RemovalPolicy};
use crate::model::{DesignObject, ObjectId, ObjectKey};
use crate::reconcile::ObjectState;
use crate::setter::SetterTarget;
use crate::store::DesignObjectStore;
use crate::target::PropertyBag;
use crate::value::PropertyMap;
use crate::{ConfigError, ConfigResult};

/// Direction of a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeMode {
    /// Apply current properties, undoing what left scope.
    Apply,
    /// Undo every handler's current properties.
    Unapply,
}

/// Result of one merge session.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Objects saved or deleted, in id order.
    pub touched: BTreeSet<ObjectId>,
    /// Values written by handlers without an object type.
    pub globals: PropertyMap,
    /// Failure that stopped the session, if any.
    pub error: Option<Arc<ConfigError>>,
}

impl MergeOutcome {
    /// Returns `true` when every handler ran.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Cached state of one object within a session.
#[derive(Debug)]
enum Entry {
    Live(DesignObject),
    Missing,
    Deleted,
}

/// Identity map and accumulated results of one merge.
struct Session<'s> {
    store: &'s mut dyn DesignObjectStore,
    mode: MergeMode,
    has_prev: bool,
    objects: BTreeMap<ObjectKey, Entry>,
    globals: PropertyBag,
    touched: BTreeSet<ObjectId>,
}

/// Run `handlers` in order against `store`.
///
/// `has_prev` tells fixed-name handlers whether a previous run exists, which
/// makes their object's state BOTH instead of CURRENT.
pub fn merge(
    store: &mut dyn DesignObjectStore,
    handlers: &[Handler],
    has_prev: bool,
    mode: MergeMode,
) -> MergeOutcome {
    let mut session = Session {
        store,
        mode,
        has_prev,
        objects: BTreeMap::new(),
        globals: PropertyBag::default(),
        touched: BTreeSet::new(),
    };
    let error = handlers
        .iter()
        .try_for_each(|handler| session.run(handler))
        .err();
    MergeOutcome {
        touched: session.touched,
        globals: session.globals.into_values(),
        error,
    }
}

impl Session<'_> {
    fn run(&mut self, handler: &Handler) -> ConfigResult<()> {
        if handler.object_type.is_none() {
            return self.run_globals(handler);
        }
        for (key, state) in handler.targets(self.has_prev, &*self.store)? {
            self.dispatch(handler, key, state)?;
        }
        Ok(())
    }

    fn run_globals(&mut self, handler: &Handler) -> ConfigResult<()> {
        let mut assoc = AssociationSets::default();
        let mut target = SetterTarget::Globals(&mut self.globals);
        let state = if self.has_prev {
            ObjectState::Both
        } else {
            ObjectState::Current
        };
        let changed = match self.mode {
            MergeMode::Apply => handler.process(&mut target, state, &mut assoc)?,
            MergeMode::Unapply => handler.unprocess(&mut target, &mut assoc)?,
        };
        debug!(handler = %handler.label(), changed, "processed global properties");
        Ok(())
    }

    fn dispatch(&mut self, handler: &Handler, key: ObjectKey, state: ObjectState) -> ConfigResult<()> {
        if matches!(self.objects.get(&key), Some(Entry::Deleted)) {
            debug!(object = %key, "object already deleted in this session");
            return Ok(());
        }
        let leaving = self.mode == MergeMode::Unapply || state == ObjectState::Previous;
        let (mut object, created) = match self.take(&key)? {
            Some(object) => (object, false),
            None if !leaving => (DesignObject::create(&key, &handler.extra)?, true),
            None => {
                debug!(object = %key, state = %state, "no object to undo");
                return Ok(());
            }
        };

        if leaving && handler.removal == RemovalPolicy::Delete {
            return self.delete(key);
        }

        let mut assoc = AssociationSets::default();
        let mut target = SetterTarget::Object(&mut object);
        let changed = match self.mode {
            MergeMode::Apply => handler.process(&mut target, state, &mut assoc)?,
            MergeMode::Unapply => handler.unprocess(&mut target, &mut assoc)?,
        };
        debug!(object = %key, state = %state, changed, created, "processed object");
        if changed || created {
            let id = self.store.save(&object, &assoc)?;
            self.touched.insert(id);
        }
        self.objects.insert(key, Entry::Live(object));
        Ok(())
    }

    /// Take the session copy of `key`, loading it on first use.
    fn take(&mut self, key: &ObjectKey) -> ConfigResult<Option<DesignObject>> {
        match self.objects.remove(key) {
            Some(Entry::Live(object)) => Ok(Some(object)),
            Some(entry) => {
                self.objects.insert(key.clone(), entry);
                Ok(None)
            }
            None => {
                let loaded = self.store.load_modifiable(key)?;
                if loaded.is_none() {
                    self.objects.insert(key.clone(), Entry::Missing);
                }
                Ok(loaded)
            }
        }
    }

    fn delete(&mut self, key: ObjectKey) -> ConfigResult<()> {
        if let Some(id) = self.store.name_to_guid(&key) {
            self.store.delete(id)?;
            self.touched.insert(id);
            debug!(object = %key, id = %id, "deleted object leaving configuration");
        }
        self.objects.insert(key, Entry::Deleted);
        Ok(())
    }
}
