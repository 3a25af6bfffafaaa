//! Handler registry and event matching

use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::events::{EventKind, EventRecord, Value};
use super::predicate::Trigger;
use super::tracker::InstanceTracker;
use crate::engine::HandlerResult;
use crate::error::Error;

/// Callback of a free-function handler
pub type FreeCallback = Rc<dyn Fn(&[Value]) -> HandlerResult>;

/// Callback of a method handler; the bound instance comes first
pub type MethodCallback<T> = Rc<dyn Fn(&mut T, &[Value]) -> HandlerResult>;

/// A registered entry, erased over its receiver type
pub trait Handler {
    /// Event kind this entry listens to
    fn kind(&self) -> EventKind;

    /// Class the entry is bound to, for method handlers
    fn class(&self) -> Option<(TypeId, &'static str)> {
        None
    }

    /// Matches `record` and invokes the callback (once per live instance for
    /// method handlers)
    fn dispatch(&self, record: &EventRecord, tracker: &InstanceTracker) -> HandlerResult;
}

struct FreeHandler {
    trigger: Trigger<()>,
    callback: FreeCallback,
}

impl Handler for FreeHandler {
    fn kind(&self) -> EventKind {
        self.trigger.kind()
    }

    fn dispatch(&self, record: &EventRecord, _tracker: &InstanceTracker) -> HandlerResult {
        if !self.trigger.matches(record, &())? {
            return Ok(());
        }
        let args = self.trigger.arguments(record)?;
        (self.callback)(&args)
    }
}

struct MethodHandler<T> {
    trigger: Trigger<T>,
    callback: MethodCallback<T>,
}

impl<T: 'static> Handler for MethodHandler<T> {
    fn kind(&self) -> EventKind {
        self.trigger.kind()
    }

    fn class(&self) -> Option<(TypeId, &'static str)> {
        Some((TypeId::of::<T>(), type_name::<T>()))
    }

    fn dispatch(&self, record: &EventRecord, tracker: &InstanceTracker) -> HandlerResult {
        for instance in tracker.instances_of::<T>() {
            let mut receiver = instance
                .try_borrow_mut()
                .map_err(|_| Error::InstanceBusy(type_name::<T>()))?;
            if !self.trigger.matches(record, &receiver)? {
                continue;
            }
            let args = self.trigger.arguments(record)?;
            (self.callback)(&mut receiver, &args)?;
        }
        Ok(())
    }
}

/// Ordered store of handler entries
///
/// No uniqueness constraint: any number of entries may share a kind, and all
/// matching entries fire in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: RefCell<Vec<Rc<dyn Handler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a free-function entry
    pub fn register(&self, trigger: Trigger<()>, callback: FreeCallback) {
        trace!(kind = ?trigger.kind(), "Registered handler");
        self.push(Rc::new(FreeHandler { trigger, callback }));
    }

    /// Stores a method entry bound to class `T`
    pub fn register_method<T: 'static>(&self, trigger: Trigger<T>, callback: MethodCallback<T>) {
        trace!(kind = ?trigger.kind(), class = type_name::<T>(), "Registered method handler");
        self.push(Rc::new(MethodHandler { trigger, callback }));
    }

    fn push(&self, entry: Rc<dyn Handler>) {
        self.entries.borrow_mut().push(entry);
    }

    /// Entries listening to `kind`, in registration order
    pub fn matching(&self, kind: EventKind) -> Vec<Rc<dyn Handler>> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// Runs every entry that matches `record`
    ///
    /// The entry list is snapshotted first, so handlers may register further
    /// handlers without affecting the current pass. The first signal or error
    /// stops the pass.
    pub fn match_and_invoke(&self, record: &EventRecord, tracker: &InstanceTracker) -> HandlerResult {
        for entry in self.matching(record.kind()) {
            entry.dispatch(record, tracker)?;
        }
        Ok(())
    }

    /// Number of entries listening to `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Classes bound by method entries, in registration order
    pub fn bound_classes(&self) -> Vec<(TypeId, &'static str)> {
        let mut classes: Vec<(TypeId, &'static str)> = Vec::new();
        for class in self.entries.borrow().iter().filter_map(|e| e.class()) {
            if !classes.iter().any(|(id, _)| *id == class.0) {
                classes.push(class);
            }
        }
        classes
    }
}
