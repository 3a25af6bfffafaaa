//! Tracking of live class instances for method handlers

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

/// Shared handle to an application-owned instance
///
/// The application keeps the strong handles; trackers only hold weak ones, so
/// dropping every `Instance` removes it from dispatch.
pub type Instance<T> = Rc<RefCell<T>>;

struct ClassEntry {
    name: &'static str,
    instances: Vec<Weak<dyn Any>>,
}

/// Maps each registered class to the weak set of its live instances
#[derive(Default)]
pub struct InstanceTracker {
    classes: RefCell<IndexMap<TypeId, ClassEntry>>,
}

impl InstanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`; registering twice keeps the tracked instances
    pub fn register_class<T: 'static>(&self) {
        self.classes
            .borrow_mut()
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(class = type_name::<T>(), "Registered class");
                ClassEntry {
                    name: type_name::<T>(),
                    instances: Vec::new(),
                }
            });
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.is_registered_id(TypeId::of::<T>())
    }

    pub fn is_registered_id(&self, id: TypeId) -> bool {
        self.classes.borrow().contains_key(&id)
    }

    /// Names of the registered classes, in registration order
    pub fn class_names(&self) -> Vec<&'static str> {
        self.classes.borrow().values().map(|c| c.name).collect()
    }

    /// Starts tracking `instance`; tracking it again is a no-op
    ///
    /// # Errors
    /// Returns [`Error::ClassNotRegistered`] if `T` was never registered.
    pub fn track<T: 'static>(&self, instance: &Instance<T>) -> Result<()> {
        let mut classes = self.classes.borrow_mut();
        let entry = classes
            .get_mut(&TypeId::of::<T>())
            .ok_or(Error::ClassNotRegistered(type_name::<T>()))?;
        if !entry.instances.iter().any(|w| same(w, instance)) {
            let erased: Rc<dyn Any> = instance.clone();
            entry.instances.push(Rc::downgrade(&erased));
        }
        Ok(())
    }

    /// Stops tracking `instance`, returning whether it was tracked
    pub fn untrack<T: 'static>(&self, instance: &Instance<T>) -> bool {
        let mut classes = self.classes.borrow_mut();
        let Some(entry) = classes.get_mut(&TypeId::of::<T>()) else {
            return false;
        };
        let before = entry.instances.len();
        entry.instances.retain(|w| !same(w, instance));
        entry.instances.len() != before
    }

    /// Snapshot of the live instances of `T`, in tracking order
    ///
    /// Instances whose strong handles are all gone are pruned here and never
    /// returned.
    pub fn instances_of<T: 'static>(&self) -> Vec<Instance<T>> {
        let mut classes = self.classes.borrow_mut();
        let Some(entry) = classes.get_mut(&TypeId::of::<T>()) else {
            return Vec::new();
        };
        entry.instances.retain(|w| w.strong_count() > 0);
        entry
            .instances
            .iter()
            .filter_map(Weak::upgrade)
            .filter_map(|rc| rc.downcast::<RefCell<T>>().ok())
            .collect()
    }

    /// Number of live instances of `T`
    pub fn live_count<T: 'static>(&self) -> usize {
        self.classes
            .borrow()
            .get(&TypeId::of::<T>())
            .map_or(0, |c| c.instances.iter().filter(|w| w.strong_count() > 0).count())
    }
}

fn same<T: 'static>(weak: &Weak<dyn Any>, instance: &Instance<T>) -> bool {
    std::ptr::addr_eq(weak.as_ptr(), Rc::as_ptr(instance))
}

/// Construction handle for a registered class
///
/// Returned by `register_cls`. Every instance created or adopted through it is
/// tracked by all the interfaces the class was registered on.
pub struct ClassHandle<T> {
    trackers: Vec<Rc<InstanceTracker>>,
    _class: PhantomData<fn() -> T>,
}

impl<T: 'static> ClassHandle<T> {
    pub(crate) fn new(trackers: Vec<Rc<InstanceTracker>>) -> Self {
        for tracker in &trackers {
            tracker.register_class::<T>();
        }
        Self {
            trackers,
            _class: PhantomData,
        }
    }

    /// Wraps `value` in a shared instance and tracks it
    pub fn spawn(&self, value: T) -> Instance<T> {
        let instance = Rc::new(RefCell::new(value));
        self.adopt(&instance);
        instance
    }

    /// Tracks an instance created elsewhere
    pub fn adopt(&self, instance: &Instance<T>) {
        for tracker in &self.trackers {
            // registered in `new`, so tracking cannot fail
            let _ = tracker.track(instance);
        }
    }

    /// Removes `instance` from every tracker, returning whether any held it
    pub fn dispose(&self, instance: &Instance<T>) -> bool {
        self.trackers
            .iter()
            .fold(false, |found, t| t.untrack(instance) || found)
    }

    /// Live instances, as seen by the first interface the class is on
    pub fn instances(&self) -> Vec<Instance<T>> {
        self.trackers
            .first()
            .map(|t| t.instances_of::<T>())
            .unwrap_or_default()
    }
}

impl<T> Clone for ClassHandle<T> {
    fn clone(&self) -> Self {
        Self {
            trackers: self.trackers.clone(),
            _class: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Button(u32);

    #[test]
    fn test_track_requires_registration() {
        let tracker = InstanceTracker::new();
        let instance = Rc::new(RefCell::new(Button(1)));
        assert!(matches!(
            tracker.track(&instance),
            Err(Error::ClassNotRegistered(_))
        ));
        tracker.register_class::<Button>();
        tracker.track(&instance).unwrap();
        assert_eq!(tracker.instances_of::<Button>().len(), 1);
    }

    #[test]
    fn test_dropped_instances_are_not_iterated() {
        let tracker = Rc::new(InstanceTracker::new());
        let class = ClassHandle::<Button>::new(vec![tracker.clone()]);
        let kept = class.spawn(Button(1));
        let dropped = class.spawn(Button(2));
        drop(dropped);

        let live = tracker.instances_of::<Button>();
        assert_eq!(live.len(), 1);
        assert!(Rc::ptr_eq(&live[0], &kept));
        assert_eq!(tracker.live_count::<Button>(), 1);
    }

    #[test]
    fn test_dispose_removes_from_all_trackers() {
        let a = Rc::new(InstanceTracker::new());
        let b = Rc::new(InstanceTracker::new());
        let class = ClassHandle::<Button>::new(vec![a.clone(), b.clone()]);
        let instance = class.spawn(Button(7));
        assert_eq!(b.instances_of::<Button>().len(), 1);

        assert!(class.dispose(&instance));
        assert!(a.instances_of::<Button>().is_empty());
        assert!(b.instances_of::<Button>().is_empty());
        assert!(!class.dispose(&instance));
    }

    #[test]
    fn test_adopt_twice_tracks_once() {
        let tracker = Rc::new(InstanceTracker::new());
        let class = ClassHandle::<Button>::new(vec![tracker.clone()]);
        let instance = class.spawn(Button(3));
        class.adopt(&instance);
        assert_eq!(tracker.instances_of::<Button>().len(), 1);
    }

    #[test]
    fn test_unregistered_class_has_no_instances() {
        let tracker = InstanceTracker::new();
        assert!(tracker.instances_of::<Button>().is_empty());
        assert!(!tracker.is_registered::<Button>());
    }
}
