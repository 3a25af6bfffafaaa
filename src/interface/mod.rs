//! Interfaces: named, activatable nodes that own handlers, tracked
//! instances, frame callbacks and subinterfaces
//!
//! Dispatch and render recurse parent-first and only through active nodes,
//! so deactivating an interface silences its whole subtree without touching
//! the children's own flags.

mod frame;
mod group;
mod registry;

pub use frame::FrameCallbacks;
pub use group::Group;
pub use registry::Registry;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::engine::HandlerResult;
use crate::error::{Error, Result};
use crate::input::{
    ClassHandle, EventKind, EventRecord, FreeCallback, HandlerRegistry, Instance, InstanceTracker,
    MethodCallback, Trigger, Value,
};

struct InterfaceInner<S> {
    name: String,
    active: Cell<bool>,
    parent: RefCell<Weak<InterfaceInner<S>>>,
    children: RefCell<Vec<Interface<S>>>,
    handlers: HandlerRegistry,
    tracker: Rc<InstanceTracker>,
    frames: FrameCallbacks<S>,
}

/// Shared handle to an interface
///
/// Cloning the handle does not copy the interface; two handles compare equal
/// when they refer to the same node. `S` is the surface type handed to frame
/// callbacks.
pub struct Interface<S> {
    inner: Rc<InterfaceInner<S>>,
}

impl<S: 'static> Interface<S> {
    /// Creates a detached, inactive interface
    ///
    /// Applications go through [`Registry::create_interface`], which also
    /// enforces name uniqueness.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(InterfaceInner {
                name: name.into(),
                active: Cell::new(false),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                handlers: HandlerRegistry::new(),
                tracker: Rc::new(InstanceTracker::new()),
                frames: FrameCallbacks::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// Marks the interface active; activating twice is a no-op
    pub fn activate(&self) {
        if !self.inner.active.replace(true) {
            debug!(interface = %self.name(), "Activated interface");
        }
    }

    /// Marks the interface inactive; children keep their own flags
    pub fn deactivate(&self) {
        if self.inner.active.replace(false) {
            debug!(interface = %self.name(), "Deactivated interface");
        }
    }

    /// Whether dispatch reaches this interface: it and every ancestor are active
    pub fn is_reachable(&self) -> bool {
        let mut node = Some(self.clone());
        while let Some(current) = node {
            if !current.is_active() {
                return false;
            }
            node = current.parent();
        }
        true
    }

    pub fn parent(&self) -> Option<Interface<S>> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Interface { inner })
    }

    /// Subinterfaces in registration order
    pub fn children(&self) -> Vec<Interface<S>> {
        self.inner.children.borrow().clone()
    }

    pub fn active_children(&self) -> Vec<Interface<S>> {
        self.inner
            .children
            .borrow()
            .iter()
            .filter(|c| c.is_active())
            .cloned()
            .collect()
    }

    /// Attaches `child` as the last subinterface
    ///
    /// # Errors
    /// - [`Error::CyclicChild`] if `child` is this interface or one of its ancestors
    /// - [`Error::DuplicateChild`] if `child` already has a parent
    pub fn register_interface(&self, child: &Interface<S>) -> Result<()> {
        let mut node = Some(self.clone());
        while let Some(current) = node {
            if current == *child {
                return Err(Error::CyclicChild {
                    child: child.name().to_string(),
                    parent: self.name().to_string(),
                });
            }
            node = current.parent();
        }
        if let Some(parent) = child.parent() {
            return Err(Error::DuplicateChild {
                child: child.name().to_string(),
                parent: parent.name().to_string(),
            });
        }

        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
        debug!(parent = %self.name(), child = %child.name(), "Registered subinterface");
        Ok(())
    }

    /// Detaches `child`, returning whether it was a subinterface of this one
    pub fn remove_interface(&self, child: &Interface<S>) -> bool {
        let mut children = self.inner.children.borrow_mut();
        let Some(index) = children.iter().position(|c| c == child) else {
            return false;
        };
        children.remove(index);
        *child.inner.parent.borrow_mut() = Weak::new();
        debug!(parent = %self.name(), child = %child.name(), "Removed subinterface");
        true
    }

    /// Registers a free-function handler
    ///
    /// The callback receives the trigger's declared parameters, in order.
    pub fn event<F>(&self, trigger: Trigger, callback: F)
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        self.event_shared(trigger, Rc::new(callback));
    }

    pub(crate) fn event_shared(&self, trigger: Trigger, callback: FreeCallback) {
        self.inner.handlers.register(trigger, callback);
    }

    /// Registers a method handler for class `T`
    ///
    /// It fires once per live instance of `T` tracked by this interface, with
    /// that instance as the receiver. Register the class with
    /// [`register_cls`](Self::register_cls) for instances to be tracked.
    pub fn method_event<T, F>(&self, trigger: Trigger<T>, callback: F)
    where
        T: 'static,
        F: Fn(&mut T, &[Value]) -> HandlerResult + 'static,
    {
        self.method_event_shared(trigger, Rc::new(callback));
    }

    pub(crate) fn method_event_shared<T: 'static>(
        &self,
        trigger: Trigger<T>,
        callback: MethodCallback<T>,
    ) {
        self.inner.handlers.register_method(trigger, callback);
    }

    /// Registers class `T` for instance tracking on this interface
    pub fn register_cls<T: 'static>(&self) -> ClassHandle<T> {
        ClassHandle::new(vec![self.tracker_rc()])
    }

    /// Tracks an instance created outside a class handle
    ///
    /// # Errors
    /// Returns [`Error::ClassNotRegistered`] if `T` was never registered here.
    pub fn register_object<T: 'static>(&self, instance: &Instance<T>) -> Result<()> {
        self.inner.tracker.track(instance)
    }

    /// Registers a frame callback
    pub fn frame<F>(&self, callback: F)
    where
        F: Fn(&mut S) -> HandlerResult + 'static,
    {
        self.frame_shared(Rc::new(callback));
    }

    pub(crate) fn frame_shared(&self, callback: Rc<dyn Fn(&mut S) -> HandlerResult>) {
        self.inner.frames.push(callback);
    }

    /// Registers a frame callback run once per live instance of `T`
    pub fn method_frame<T, F>(&self, callback: F)
    where
        T: 'static,
        F: Fn(&mut T, &mut S) -> HandlerResult + 'static,
    {
        self.method_frame_shared(Rc::new(callback));
    }

    pub(crate) fn method_frame_shared<T: 'static>(
        &self,
        callback: Rc<dyn Fn(&mut T, &mut S) -> HandlerResult>,
    ) {
        self.inner.frames.push_method(callback);
    }

    /// Dispatches `record` to this subtree
    ///
    /// Inactive interfaces are skipped with their whole subtree. Otherwise
    /// this interface's handlers run first, then each child in registration
    /// order. A signal or error stops the pass.
    pub fn dispatch_event(&self, record: &EventRecord) -> HandlerResult {
        if !self.is_active() {
            return Ok(());
        }
        self.inner
            .handlers
            .match_and_invoke(record, &self.inner.tracker)?;
        for child in self.children() {
            child.dispatch_event(record)?;
        }
        Ok(())
    }

    /// Renders this subtree onto `surface`, parent beneath children
    pub fn render(&self, surface: &mut S) -> HandlerResult {
        if !self.is_active() {
            return Ok(());
        }
        self.inner.frames.run(surface, &self.inner.tracker)?;
        for child in self.children() {
            child.render(surface)?;
        }
        Ok(())
    }

    /// Number of handlers on this interface listening to `kind`
    pub fn count_handlers(&self, kind: EventKind) -> usize {
        self.inner.handlers.count(kind)
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.inner.handlers
    }

    pub fn tracker(&self) -> &InstanceTracker {
        &self.inner.tracker
    }

    pub(crate) fn tracker_rc(&self) -> Rc<InstanceTracker> {
        Rc::clone(&self.inner.tracker)
    }

    pub fn frame_count(&self) -> usize {
        self.inner.frames.len()
    }
}

impl<S> Clone for Interface<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> PartialEq for Interface<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Eq for Interface<S> {}

impl<S> fmt::Debug for Interface<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self
            .inner
            .children
            .borrow()
            .iter()
            .map(|c| c.inner.name.clone())
            .collect();
        f.debug_struct("Interface")
            .field("name", &self.inner.name)
            .field("active", &self.inner.active.get())
            .field("children", &children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Interrupt, Signal, quit};
    use crate::input::MouseButton;

    type Node = Interface<Vec<String>>;

    fn hits() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn record_on(node: &Node, kind: EventKind, log: &Rc<RefCell<Vec<String>>>) {
        let log = log.clone();
        let name = node.name().to_string();
        node.event(Trigger::new(kind), move |_| {
            log.borrow_mut().push(name.clone());
            Ok(())
        });
    }

    #[test]
    fn test_activation_is_idempotent() {
        let node = Node::new("menu");
        assert!(!node.is_active());
        node.activate();
        node.activate();
        assert!(node.is_active());
        node.deactivate();
        node.deactivate();
        assert!(!node.is_active());
    }

    #[test]
    fn test_inactive_parent_skips_subtree() {
        let parent = Node::new("parent");
        let child = Node::new("child");
        parent.register_interface(&child).unwrap();
        child.activate();

        let log = hits();
        record_on(&child, EventKind::Quit, &log);
        parent.dispatch_event(&EventRecord::quit()).unwrap();
        assert!(log.borrow().is_empty());
        assert!(!child.is_reachable());

        parent.activate();
        parent.dispatch_event(&EventRecord::quit()).unwrap();
        assert_eq!(*log.borrow(), ["child"]);
        assert!(child.is_reachable());
    }

    #[test]
    fn test_parent_dispatches_before_children() {
        let parent = Node::new("parent");
        let first = Node::new("first");
        let second = Node::new("second");
        parent.register_interface(&first).unwrap();
        parent.register_interface(&second).unwrap();
        for node in [&parent, &first, &second] {
            node.activate();
        }

        let log = hits();
        record_on(&second, EventKind::Quit, &log);
        record_on(&first, EventKind::Quit, &log);
        record_on(&parent, EventKind::Quit, &log);
        parent.dispatch_event(&EventRecord::quit()).unwrap();
        assert_eq!(*log.borrow(), ["parent", "first", "second"]);
    }

    #[test]
    fn test_child_with_parent_is_rejected() {
        let a = Node::new("a");
        let b = Node::new("b");
        let child = Node::new("child");
        a.register_interface(&child).unwrap();
        let err = b.register_interface(&child).unwrap_err();
        assert!(matches!(err, Error::DuplicateChild { ref parent, .. } if parent == "a"));
        assert_eq!(a.children().len(), 1);
        assert!(b.children().is_empty());
    }

    #[test]
    fn test_ancestor_cannot_become_child() {
        let root = Node::new("root");
        let mid = Node::new("mid");
        let leaf = Node::new("leaf");
        root.register_interface(&mid).unwrap();
        mid.register_interface(&leaf).unwrap();
        assert!(matches!(
            leaf.register_interface(&root),
            Err(Error::CyclicChild { .. })
        ));
        assert!(matches!(
            leaf.register_interface(&leaf),
            Err(Error::CyclicChild { .. })
        ));
        let loose = Node::new("loose");
        assert!(matches!(
            loose.register_interface(&loose),
            Err(Error::CyclicChild { .. })
        ));
        assert!(loose.parent().is_none());
        assert_eq!(leaf.parent(), Some(mid.clone()));
    }

    #[test]
    fn test_remove_interface_allows_reattach() {
        let a = Node::new("a");
        let b = Node::new("b");
        let child = Node::new("child");
        a.register_interface(&child).unwrap();
        assert!(a.remove_interface(&child));
        assert!(!a.remove_interface(&child));
        assert!(child.parent().is_none());
        b.register_interface(&child).unwrap();
        assert_eq!(child.parent(), Some(b.clone()));
    }

    #[test]
    fn test_method_event_binds_tracked_instances() {
        struct Button {
            label: &'static str,
            clicked: bool,
        }
        let node = Node::new("menu");
        node.activate();
        let buttons = node.register_cls::<Button>();
        let ok = buttons.spawn(Button { label: "ok", clicked: false });
        let cancel = buttons.spawn(Button { label: "cancel", clicked: false });

        node.method_event(
            Trigger::new(EventKind::Click).bound("button", |b: &Button, v| {
                b.label == "ok" && v.as_button() == Some(MouseButton::Left)
            }),
            |b, _| {
                b.clicked = true;
                Ok(())
            },
        );
        node.dispatch_event(&EventRecord::click(MouseButton::Left, (0, 0)))
            .unwrap();
        assert!(ok.borrow().clicked);
        assert!(!cancel.borrow().clicked);
    }

    #[test]
    fn test_register_object_requires_class() {
        struct Widget;
        let node = Node::new("menu");
        let widget = Rc::new(RefCell::new(Widget));
        assert!(matches!(
            node.register_object(&widget),
            Err(Error::ClassNotRegistered(_))
        ));
        node.register_cls::<Widget>();
        node.register_object(&widget).unwrap();
        assert_eq!(node.tracker().live_count::<Widget>(), 1);
    }

    #[test]
    fn test_render_order_and_inactive_skip() {
        let base = Node::new("base");
        let popup = Node::new("popup");
        base.register_interface(&popup).unwrap();
        base.frame(|out: &mut Vec<String>| {
            out.push("base".into());
            Ok(())
        });
        popup.frame(|out: &mut Vec<String>| {
            out.push("popup".into());
            Ok(())
        });

        let mut out = Vec::new();
        base.render(&mut out).unwrap();
        assert!(out.is_empty());

        base.activate();
        base.render(&mut out).unwrap();
        assert_eq!(out, ["base"]);

        popup.activate();
        out.clear();
        base.render(&mut out).unwrap();
        assert_eq!(out, ["base", "popup"]);
    }

    #[test]
    fn test_signal_propagates_out_of_subtree() {
        let parent = Node::new("parent");
        let child = Node::new("child");
        parent.register_interface(&child).unwrap();
        parent.activate();
        child.activate();
        child.event(Trigger::new(EventKind::Quit), |_| quit());
        let result = parent.dispatch_event(&EventRecord::quit());
        assert!(matches!(result, Err(Interrupt::Signal(Signal::Quit))));
    }
}
